use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use time::Duration;

/// How long a pending return URL survives the identity-provider round trip.
const PENDING_RETURN_TTL_MINUTES: i64 = 10;

/// Get a cookie value, treating blank values as absent.
pub(super) fn get(jar: &CookieJar, name: &str) -> Option<String> {
    jar.get(name)
        .map(|c| c.value().trim())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Create the session linkage cookie holding a verified token.
pub(super) fn link_cookie(name: &str, token: &str, secure: bool) -> Cookie<'static> {
    Cookie::build((name.to_string(), token.to_string()))
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .path("/".to_string())
        .build()
}

/// Create the pending return URL cookie.
pub(super) fn pending_return_cookie(name: &str, url: &str, secure: bool) -> Cookie<'static> {
    Cookie::build((name.to_string(), url.to_string()))
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .path("/".to_string())
        .max_age(Duration::minutes(PENDING_RETURN_TTL_MINUTES))
        .build()
}

/// Create the cookie used to remove `name` from the client.
pub(super) fn removal_cookie(name: &str) -> Cookie<'static> {
    Cookie::build((name.to_string(), ""))
        .path("/".to_string())
        .max_age(Duration::ZERO)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_cookie_is_absent() {
        let jar = CookieJar::new()
            .add(Cookie::new("ssoid", "   "))
            .add(Cookie::new("preurl", "https://app.example.com/x"));

        assert_eq!(get(&jar, "ssoid"), None);
        assert_eq!(get(&jar, "missing"), None);
        assert_eq!(
            get(&jar, "preurl").as_deref(),
            Some("https://app.example.com/x")
        );
    }

    #[test]
    fn link_cookie_attributes() {
        let cookie = link_cookie("ssoid", "abc123", true);

        assert_eq!(cookie.name(), "ssoid");
        assert_eq!(cookie.value(), "abc123");
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.max_age(), None);
    }

    #[test]
    fn pending_return_cookie_is_short_lived() {
        let cookie = pending_return_cookie("preurl", "https://app.example.com/x", false);

        assert_eq!(cookie.max_age(), Some(Duration::minutes(10)));
        assert_eq!(cookie.secure(), Some(false));
    }

    #[test]
    fn removal_cookie_expires_immediately() {
        let cookie = removal_cookie("preurl");

        assert_eq!(cookie.value(), "");
        assert_eq!(cookie.max_age(), Some(Duration::ZERO));
    }
}
