//! Notion writes: create the destination page and append page blocks.
//!
//! Every published slide becomes exactly two blocks, in this order:
//!
//! ```text
//! image      { type: external, external: { url } }
//! paragraph  { rich_text: [ text: "Notes can be added here..." ] }
//! ```
//!
//! Both go out in a single `PATCH /blocks/{id}/children` call so a page's
//! image and note either land together or not at all (as far as Notion's
//! own atomicity goes).

use crate::error::{Pdf2NotionError, WorkspaceOperation};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;
use tracing::debug;

/// Creates the destination page and fills it with blocks.
#[async_trait]
pub trait WorkspaceWriter: Send + Sync {
    /// Create a page titled `title` under `parent_id`; returns the new page ID.
    async fn create_container(&self, parent_id: &str, title: &str)
        -> Result<String, Pdf2NotionError>;

    /// Append the image block and the note block for one page.
    async fn append_page_blocks(
        &self,
        container_id: &str,
        image_url: &str,
    ) -> Result<(), Pdf2NotionError>;
}

// ── Block model ──────────────────────────────────────────────────────────

/// A Notion block as sent in a children-append request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Block {
    object: &'static str,
    #[serde(flatten)]
    pub content: BlockContent,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BlockContent {
    Image { image: ExternalImage },
    Paragraph { paragraph: Paragraph },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExternalImage {
    #[serde(rename = "type")]
    kind: &'static str,
    pub external: ExternalUrl,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExternalUrl {
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Paragraph {
    pub rich_text: Vec<RichText>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RichText {
    #[serde(rename = "type")]
    kind: &'static str,
    pub text: TextContent,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextContent {
    pub content: String,
}

impl Block {
    pub fn external_image(url: impl Into<String>) -> Self {
        Self {
            object: "block",
            content: BlockContent::Image {
                image: ExternalImage {
                    kind: "external",
                    external: ExternalUrl { url: url.into() },
                },
            },
        }
    }

    pub fn paragraph(text: impl Into<String>) -> Self {
        Self {
            object: "block",
            content: BlockContent::Paragraph {
                paragraph: Paragraph {
                    rich_text: vec![RichText {
                        kind: "text",
                        text: TextContent {
                            content: text.into(),
                        },
                    }],
                },
            },
        }
    }
}

/// The fixed image-then-note pair appended for every page.
pub fn page_blocks(image_url: &str, note_text: &str) -> [Block; 2] {
    [Block::external_image(image_url), Block::paragraph(note_text)]
}

// ── Notion client ────────────────────────────────────────────────────────

/// [`WorkspaceWriter`] backed by the Notion REST API.
#[derive(Debug, Clone)]
pub struct NotionClient {
    client: reqwest::Client,
    base_url: String,
    token: String,
    api_version: String,
    note_text: String,
}

impl NotionClient {
    pub fn new(
        base_url: impl Into<String>,
        token: impl Into<String>,
        api_version: impl Into<String>,
        note_text: impl Into<String>,
        timeout_secs: u64,
    ) -> Result<Self, Pdf2NotionError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|source| Pdf2NotionError::Http {
                service: "Notion",
                source,
            })?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
            api_version: api_version.into(),
            note_text: note_text.into(),
        })
    }

    async fn send(
        &self,
        operation: WorkspaceOperation,
        request: reqwest::RequestBuilder,
    ) -> Result<(u16, String), Pdf2NotionError> {
        let response = request
            .bearer_auth(&self.token)
            .header("Notion-Version", &self.api_version)
            .send()
            .await
            .map_err(|source| Pdf2NotionError::Http {
                service: "Notion",
                source,
            })?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(|source| Pdf2NotionError::Http {
            service: "Notion",
            source,
        })?;

        if !(200..300).contains(&status) {
            return Err(workspace_error(operation, status, &body));
        }
        Ok((status, body))
    }
}

#[async_trait]
impl WorkspaceWriter for NotionClient {
    async fn create_container(
        &self,
        parent_id: &str,
        title: &str,
    ) -> Result<String, Pdf2NotionError> {
        let body = json!({
            "parent": { "page_id": parent_id },
            "properties": {
                "title": { "title": [ { "text": { "content": title } } ] }
            }
        });
        debug!("Creating Notion page '{}' under {}", title, parent_id);

        let request = self.client.post(format!("{}/pages", self.base_url)).json(&body);
        let (status, raw) = self.send(WorkspaceOperation::CreatePage, request).await?;
        parse_created_page(status, &raw)
    }

    async fn append_page_blocks(
        &self,
        container_id: &str,
        image_url: &str,
    ) -> Result<(), Pdf2NotionError> {
        let children = page_blocks(image_url, &self.note_text);
        debug!("Appending image + note blocks to {}", container_id);

        let request = self
            .client
            .patch(format!("{}/blocks/{}/children", self.base_url, container_id))
            .json(&json!({ "children": children }));
        self.send(WorkspaceOperation::AppendBlocks, request).await?;
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct CreatedPage {
    id: String,
}

#[derive(Debug, Deserialize)]
struct NotionErrorBody {
    #[serde(default)]
    code: Option<String>,
    message: String,
}

fn parse_created_page(status: u16, raw: &str) -> Result<String, Pdf2NotionError> {
    serde_json::from_str::<CreatedPage>(raw)
        .map(|p| p.id)
        .map_err(|e| Pdf2NotionError::WorkspaceApi {
            operation: WorkspaceOperation::CreatePage,
            status,
            message: format!("response had no page id: {e}"),
        })
}

/// Map a non-2xx Notion response to an error, keeping Notion's own message.
fn workspace_error(operation: WorkspaceOperation, status: u16, body: &str) -> Pdf2NotionError {
    let message = match serde_json::from_str::<NotionErrorBody>(body) {
        Ok(NotionErrorBody {
            code: Some(code),
            message,
        }) => format!("{code}: {message}"),
        Ok(NotionErrorBody { code: None, message }) => message,
        Err(_) => body.to_string(),
    };
    Pdf2NotionError::WorkspaceApi {
        operation,
        status,
        message,
    }
}
