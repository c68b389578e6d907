//! Inline HTML rendering for the three pages the portal serves.
//!
//! The pages are deliberately small; there is no template engine. Every
//! client-supplied string is HTML-escaped and filenames in links are
//! percent-encoded.

use chrono::{DateTime, Local};
use filestore::FileEntry;

/// Escape a string for safe interpolation into HTML text and attributes.
pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

fn flash_block(flash: Option<&str>) -> String {
    match flash {
        Some(message) => format!(
            "<p class=\"flash\">{}</p>\n",
            escape_html(message)
        ),
        None => String::new(),
    }
}

fn page(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{title}</title>\n\
         <style>\n\
         body {{ font-family: sans-serif; max-width: 40em; margin: 2em auto; }}\n\
         .flash {{ background: #fff3cd; border: 1px solid #ffecb5; padding: 0.5em; }}\n\
         table {{ border-collapse: collapse; width: 100%; }}\n\
         td, th {{ border: 1px solid #ccc; padding: 0.4em; text-align: left; }}\n\
         </style>\n</head>\n<body>\n{body}</body>\n</html>\n",
        title = escape_html(title),
        body = body,
    )
}

/// The OTP challenge page served at `/`.
pub fn challenge(flash: Option<&str>, totp: bool) -> String {
    let mut body = String::new();
    body.push_str(&flash_block(flash));
    body.push_str("<h1>Enter OTP</h1>\n");
    body.push_str(
        "<form method=\"post\" action=\"/\">\n\
         <input type=\"text\" name=\"otp\" autocomplete=\"one-time-code\" autofocus>\n\
         <button type=\"submit\">Verify</button>\n</form>\n",
    );
    if totp {
        body.push_str("<p><a href=\"/setup\">Set up an authenticator app</a></p>\n");
    }
    page("Enter OTP", &body)
}

/// The authenticator enrollment page served at `/setup`.
pub fn setup(secret_b32: &str, qr_png_b64: &str) -> String {
    let body = format!(
        "<h1>Authenticator setup</h1>\n\
         <p>Scan the QR code with your authenticator app, or enter the secret manually.</p>\n\
         <img src=\"data:image/png;base64,{qr}\" alt=\"Provisioning QR code\">\n\
         <p>Secret: <code>{secret}</code></p>\n\
         <p><a href=\"/\">Back to the challenge</a></p>\n",
        qr = qr_png_b64,
        secret = escape_html(secret_b32),
    );
    page("Authenticator setup", &body)
}

/// The file panel served at `/file_panel`.
pub fn file_panel(entries: &[FileEntry], flash: Option<&str>) -> String {
    let mut body = String::new();
    body.push_str(&flash_block(flash));
    body.push_str("<h1>Files</h1>\n");
    body.push_str(
        "<form method=\"post\" action=\"/upload\" enctype=\"multipart/form-data\">\n\
         <input type=\"file\" name=\"file\">\n\
         <button type=\"submit\">Upload</button>\n</form>\n\
         <p>Uploading a file with the name of an existing one replaces it.</p>\n",
    );

    if entries.is_empty() {
        body.push_str("<p>No files uploaded yet.</p>\n");
    } else {
        body.push_str("<table>\n<tr><th>Name</th><th>Modified</th><th></th><th></th></tr>\n");
        for entry in entries {
            let shown = escape_html(&entry.name);
            let href = urlencoding::encode(&entry.name);
            let modified = DateTime::<Local>::from(entry.modified)
                .format("%Y-%m-%d %H:%M")
                .to_string();
            body.push_str(&format!(
                "<tr><td>{shown}</td><td>{modified}</td>\
                 <td><a href=\"/download/{href}\">Download</a></td>\
                 <td><form method=\"post\" action=\"/delete/{href}\">\
                 <button type=\"submit\">Delete</button></form></td></tr>\n",
            ));
        }
        body.push_str("</table>\n");
    }
    body.push_str("<p><a href=\"/logout\">Log out</a></p>\n");
    page("Files", &body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::SystemTime;

    #[test]
    fn test_escape_html_neutralizes_markup() {
        assert_eq!(
            escape_html("<script>\"x\" & 'y'</script>"),
            "&lt;script&gt;&quot;x&quot; &amp; &#x27;y&#x27;&lt;/script&gt;"
        );
        assert_eq!(escape_html("plain.txt"), "plain.txt");
    }

    #[test]
    fn test_panel_escapes_and_encodes_names() {
        let entries = vec![FileEntry {
            name: "a <b>&.txt".to_string(),
            modified: SystemTime::now(),
        }];
        let html = file_panel(&entries, None);
        assert!(html.contains("a &lt;b&gt;&amp;.txt"));
        assert!(html.contains("/download/a%20%3Cb%3E%26.txt"));
        assert!(!html.contains("<b>&.txt"));
    }

    #[test]
    fn test_challenge_shows_flash_once_rendered() {
        let html = challenge(Some("Invalid OTP. Please try again."), true);
        assert!(html.contains("Invalid OTP. Please try again."));
        assert!(html.contains("/setup"));

        let plain = challenge(None, false);
        assert!(!plain.contains("class=\"flash\""));
        assert!(!plain.contains("/setup"));
    }
}
