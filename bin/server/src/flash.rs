//! Flash-style status messages.
//!
//! Every failure or success on the panel surfaces as a one-shot message plus
//! a redirect. The message rides in a base64-encoded cookie that the next
//! page render consumes and removes.

use actix_web::cookie::{Cookie, SameSite};
use actix_web::http::header;
use actix_web::{HttpRequest, HttpResponse};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::constants::FLASH_COOKIE;

/// Plain redirect without a message.
pub fn redirect(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location.to_string()))
        .finish()
}

/// Redirect carrying a flash message for the target page.
pub fn flash_redirect(location: &str, message: &str) -> HttpResponse {
    let cookie = Cookie::build(FLASH_COOKIE, STANDARD.encode(message))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .finish();
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location.to_string()))
        .cookie(cookie)
        .finish()
}

/// The pending flash message, if any. The caller renders it and attaches
/// [`removal_cookie`] so it shows exactly once.
pub fn take_flash(req: &HttpRequest) -> Option<String> {
    let cookie = req.cookie(FLASH_COOKIE)?;
    let bytes = STANDARD.decode(cookie.value()).ok()?;
    String::from_utf8(bytes).ok()
}

/// Removal cookie clearing a consumed flash message.
pub fn removal_cookie() -> Cookie<'static> {
    let mut cookie = Cookie::new(FLASH_COOKIE, "");
    cookie.set_path("/");
    cookie.make_removal();
    cookie
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::test::TestRequest;

    #[test]
    fn test_flash_redirect_sets_cookie_and_location() {
        let resp = flash_redirect("/file_panel", "note.txt uploaded successfully!");
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            resp.headers().get(header::LOCATION).unwrap(),
            "/file_panel"
        );
        let set_cookie = resp.headers().get(header::SET_COOKIE).unwrap();
        assert!(set_cookie.to_str().unwrap().starts_with("flash="));
    }

    #[test]
    fn test_take_flash_roundtrip() {
        let encoded = STANDARD.encode("Invalid OTP. Please try again.");
        let req = TestRequest::default()
            .cookie(Cookie::new(FLASH_COOKIE, encoded))
            .to_http_request();
        assert_eq!(
            take_flash(&req).as_deref(),
            Some("Invalid OTP. Please try again.")
        );
    }

    #[test]
    fn test_take_flash_ignores_garbage() {
        let req = TestRequest::default()
            .cookie(Cookie::new(FLASH_COOKIE, "%%% not base64 %%%"))
            .to_http_request();
        assert_eq!(take_flash(&req), None);
    }
}
