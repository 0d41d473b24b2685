use crate::config::GitHub as GitHubConfig;
use crate::source::{PAGE_SIZE, SourceError, SponsorSource};
use crate::types::{Sponsor, SponsorPage};
use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue, USER_AGENT};
use serde::{Deserialize, Serialize};
use url::Url;

const SPONSORSHIPS_QUERY: &str = r#"
query($cursor: String, $first: Int!) {
  viewer {
    sponsorshipsAsMaintainer(first: $first, after: $cursor) {
      pageInfo {
        endCursor
        hasNextPage
      }
      nodes {
        sponsorEntity {
          ... on User {
            name
            login
            avatarUrl
          }
          ... on Organization {
            name
            login
            avatarUrl
          }
        }
      }
    }
  }
}
"#;

#[derive(Serialize)]
struct GraphQlRequest<'a> {
    query: &'static str,
    variables: Variables<'a>,
}

#[derive(Serialize)]
struct Variables<'a> {
    cursor: Option<&'a str>,
    first: usize,
}

#[derive(Deserialize)]
struct GraphQlResponse {
    data: Option<SponsorshipsData>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

#[derive(Deserialize)]
struct GraphQlError {
    message: String,
}

#[derive(Deserialize)]
struct SponsorshipsData {
    viewer: Viewer,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Viewer {
    sponsorships_as_maintainer: SponsorshipConnection,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SponsorshipConnection {
    page_info: PageInfo,
    #[serde(default)]
    nodes: Vec<Option<SponsorshipNode>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PageInfo {
    end_cursor: Option<String>,
    has_next_page: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SponsorshipNode {
    sponsor_entity: Option<SponsorEntity>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SponsorEntity {
    name: Option<String>,
    login: String,
    avatar_url: String,
}

impl From<SponsorEntity> for Sponsor {
    fn from(entity: SponsorEntity) -> Self {
        Sponsor {
            name: entity.name.unwrap_or_default(),
            login: entity.login,
            avatar_url: entity.avatar_url,
        }
    }
}

/// Lists the sponsors of the token owner through the GitHub GraphQL API.
pub struct GitHubSource {
    client: reqwest::Client,
    endpoint: Url,
}

impl GitHubSource {
    pub fn new(config: &GitHubConfig) -> Result<Self, SourceError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", config.token))
                .map_err(|_| SourceError::InvalidToken)?,
        );
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(USER_AGENT, HeaderValue::from_static("sponsors-api"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout())
            .build()?;

        Ok(GitHubSource {
            client,
            endpoint: config.endpoint.clone(),
        })
    }
}

#[async_trait]
impl SponsorSource for GitHubSource {
    async fn fetch_page(&self, cursor: Option<&str>) -> Result<SponsorPage, SourceError> {
        let request = GraphQlRequest {
            query: SPONSORSHIPS_QUERY,
            variables: Variables {
                cursor,
                first: PAGE_SIZE,
            },
        };

        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(SourceError::Status(response.status()));
        }

        let body = response.json::<GraphQlResponse>().await?;

        if !body.errors.is_empty() {
            let messages: Vec<String> = body.errors.into_iter().map(|e| e.message).collect();
            return Err(SourceError::GraphQl(messages.join("; ")));
        }

        let connection = body
            .data
            .ok_or_else(|| SourceError::GraphQl("response contained no data".into()))?
            .viewer
            .sponsorships_as_maintainer;

        // Sponsorships whose sponsor is no longer visible come back as null.
        let sponsors = connection
            .nodes
            .into_iter()
            .flatten()
            .filter_map(|node| node.sponsor_entity)
            .map(Sponsor::from)
            .collect();

        Ok(SponsorPage {
            sponsors,
            has_next_page: connection.page_info.has_next_page,
            end_cursor: connection.page_info.end_cursor,
        })
    }
}
