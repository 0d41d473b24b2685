use crate::errors::{GatewayError, HandlerBody};
use crate::placeholder::PLACEHOLDER_PNG;
use hyper::header::{CONTENT_TYPE, LOCATION};
use hyper::{Response, StatusCode};
use percent_encoding::percent_decode_str;
use shared::http::full_body;
use sponsors::Snapshot;
use std::fmt::Write;

/// Number of entries in the markdown list, independent of the sponsor count.
pub const MARKDOWN_SPONSOR_COUNT: usize = 100;

pub const MARKDOWN_PREFIX: &str = "/sponsor/markdown";
pub const AVATAR_PREFIX: &str = "/sponsor/avatar";
pub const PROFILE_PREFIX: &str = "/sponsor/profile";

/// Markdown image links for the first `MARKDOWN_SPONSOR_COUNT` positions,
/// pointing back at this service's avatar and profile endpoints.
pub fn render_markdown(base_url: &str) -> String {
    let mut out = String::new();
    for i in 0..MARKDOWN_SPONSOR_COUNT {
        let _ = writeln!(
            out,
            r#"[<img src="{base_url}{AVATAR_PREFIX}/{i}" width="35">]({base_url}{PROFILE_PREFIX}/{i})"#
        );
    }
    out
}

pub fn markdown(base_url: &str) -> Result<Response<HandlerBody>, GatewayError> {
    Ok(Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_TYPE, "text/markdown")
        .body(full_body(render_markdown(base_url)))?)
}

/// Redirects to the avatar of the sponsor at the index in the path.
/// Positions past the end get the placeholder image instead.
pub fn avatar(path: &str, snapshot: &Snapshot) -> Result<Response<HandlerBody>, GatewayError> {
    let index = parse_index(path, AVATAR_PREFIX)?;

    match snapshot.get(index) {
        Some(sponsor) => redirect(&sponsor.avatar_url),
        None => Ok(Response::builder()
            .status(StatusCode::OK)
            .header(CONTENT_TYPE, "image/png")
            .body(full_body(PLACEHOLDER_PNG))?),
    }
}

/// Redirects to the GitHub profile of the sponsor at the index in the path.
pub fn profile(path: &str, snapshot: &Snapshot) -> Result<Response<HandlerBody>, GatewayError> {
    let index = parse_index(path, PROFILE_PREFIX)?;
    let sponsor = snapshot.get(index).ok_or(GatewayError::NotFound(index))?;

    redirect(&sponsor.profile_url())
}

// Index is the percent-decoded remainder of the path after "{prefix}/".
fn parse_index(path: &str, prefix: &str) -> Result<usize, GatewayError> {
    path.strip_prefix(prefix)
        .and_then(|rest| rest.strip_prefix('/'))
        .and_then(|index| percent_decode_str(index).decode_utf8().ok())
        .and_then(|index| index.parse::<usize>().ok())
        .ok_or_else(|| GatewayError::InvalidIndex(path.to_string()))
}

fn redirect(location: &str) -> Result<Response<HandlerBody>, GatewayError> {
    Ok(Response::builder()
        .status(StatusCode::TEMPORARY_REDIRECT)
        .header(LOCATION, location)
        .body(full_body(format!("Redirecting to {location}")))?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use sponsors::testutils::make_sponsors;

    async fn body_bytes(response: Response<HandlerBody>) -> Vec<u8> {
        response
            .into_body()
            .collect()
            .await
            .unwrap()
            .to_bytes()
            .to_vec()
    }

    #[test]
    fn test_parse_index() {
        assert_eq!(parse_index("/sponsor/avatar/0", AVATAR_PREFIX).unwrap(), 0);
        assert_eq!(parse_index("/sponsor/avatar/42", AVATAR_PREFIX).unwrap(), 42);
        assert_eq!(parse_index("/sponsor/avatar/%31", AVATAR_PREFIX).unwrap(), 1);
        assert_eq!(parse_index("/sponsor/profile/1%32", PROFILE_PREFIX).unwrap(), 12);

        for bad in [
            "/sponsor/avatar",
            "/sponsor/avatar/",
            "/sponsor/avatar/abc",
            "/sponsor/avatar/-1",
            "/sponsor/avatar/1.5",
            "/sponsor/avatar/1/2",
            "/sponsor/avatar/1%2F2",
            "/sponsor/avatar/%FF",
            "/sponsor/avatar/%3",
            "/sponsor/avatars/1",
        ] {
            assert!(
                matches!(
                    parse_index(bad, AVATAR_PREFIX),
                    Err(GatewayError::InvalidIndex(_))
                ),
                "{bad} should not parse"
            );
        }
    }

    #[test]
    fn test_render_markdown() {
        let markdown = render_markdown("https://sponsors.example.com");
        let lines: Vec<&str> = markdown.lines().collect();

        assert_eq!(lines.len(), MARKDOWN_SPONSOR_COUNT);
        assert_eq!(
            lines[0],
            r#"[<img src="https://sponsors.example.com/sponsor/avatar/0" width="35">](https://sponsors.example.com/sponsor/profile/0)"#
        );
        assert_eq!(
            lines[99],
            r#"[<img src="https://sponsors.example.com/sponsor/avatar/99" width="35">](https://sponsors.example.com/sponsor/profile/99)"#
        );
        assert!(markdown.ends_with('\n'));
    }

    #[tokio::test]
    async fn test_avatar() {
        let snapshot = Snapshot::new(make_sponsors(150));

        for index in [0, 75, 149] {
            let response = avatar(&format!("/sponsor/avatar/{index}"), &snapshot).unwrap();
            assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
            assert_eq!(
                response.headers().get(LOCATION).unwrap(),
                snapshot.get(index).unwrap().avatar_url.as_str()
            );
        }

        for index in [150, 200] {
            let response = avatar(&format!("/sponsor/avatar/{index}"), &snapshot).unwrap();
            assert_eq!(response.status(), StatusCode::OK);
            assert_eq!(response.headers().get(CONTENT_TYPE).unwrap(), "image/png");
            assert_eq!(body_bytes(response).await, PLACEHOLDER_PNG);
        }
    }

    #[tokio::test]
    async fn test_avatar_empty_snapshot() {
        let response = avatar("/sponsor/avatar/0", &Snapshot::default()).unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_bytes(response).await, PLACEHOLDER_PNG);
    }

    #[tokio::test]
    async fn test_profile() {
        let snapshot = Snapshot::new(make_sponsors(150));

        let response = profile("/sponsor/profile/149", &snapshot).unwrap();
        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(
            response.headers().get(LOCATION).unwrap(),
            "https://github.com/sponsor149"
        );
        assert_eq!(
            body_bytes(response).await,
            b"Redirecting to https://github.com/sponsor149"
        );

        assert!(matches!(
            profile("/sponsor/profile/150", &snapshot),
            Err(GatewayError::NotFound(150))
        ));
        assert!(matches!(
            profile("/sponsor/profile/x", &snapshot),
            Err(GatewayError::InvalidIndex(_))
        ));
    }
}
