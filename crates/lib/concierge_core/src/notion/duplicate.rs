//! Builds create-requests that copy an existing database or page.
//!
//! Duplication is two reads followed by one write. Everything here is pure:
//! it turns the two read results into the body of the single create call,
//! so a failed write never leaves anything behind.

use serde::Serialize;
use serde_json::{Map, Value, json};

use super::{NotionError, NotionResult};

/// Suffix appended to the title of a copy.
pub const COPY_SUFFIX: &str = " (Copy)";

/// Maximum children accepted by a single create call.
pub const MAX_CHILDREN_PER_REQUEST: usize = 100;

/// Page property types computed by Notion; they cannot be written.
const READ_ONLY_PROPERTY_TYPES: &[&str] = &[
    "formula",
    "rollup",
    "created_time",
    "created_by",
    "last_edited_time",
    "last_edited_by",
    "unique_id",
    "verification",
    "button",
];

/// Block types the API cannot create.
const UNCOPYABLE_BLOCK_TYPES: &[&str] = &[
    "child_page",
    "child_database",
    "unsupported",
    "link_preview",
    "synced_block",
];

/// Database property types the API cannot create.
const UNCREATABLE_SCHEMA_TYPES: &[&str] = &["status", "unique_id", "verification", "button"];

/// Result of a duplicate operation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DuplicateResult {
    /// The newly created resource as returned by Notion.
    pub resource: Value,
    pub copied_children: usize,
    /// Children of the first listing page (at most 100) that were not copied.
    pub skipped_children: usize,
    /// The source had more children than the first listing page; those are
    /// neither copied nor counted.
    pub has_more_children: bool,
}

impl DuplicateResult {
    pub fn with_more_children(mut self, has_more: bool) -> Self {
        self.has_more_children = has_more;
        self
    }
}

/// A create body plus the child accounting that went into it.
#[derive(Debug, Clone)]
pub struct CopyPlan {
    pub body: Value,
    pub copied_children: usize,
    pub skipped_children: usize,
}

impl CopyPlan {
    pub fn into_result(self, resource: Value) -> DuplicateResult {
        DuplicateResult {
            resource,
            copied_children: self.copied_children,
            skipped_children: self.skipped_children,
            has_more_children: false,
        }
    }
}

/// Concatenated `plain_text` of a rich-text array.
pub fn plain_text(rich_text: &Value) -> String {
    rich_text
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|item| item.get("plain_text").or_else(|| item.pointer("/text/content")))
                .filter_map(Value::as_str)
                .collect()
        })
        .unwrap_or_default()
}

/// Rich-text array for a copy's title.
fn copy_title(original: Option<&Value>) -> Value {
    let mut items: Vec<Value> = original
        .and_then(Value::as_array)
        .map(|items| items.iter().map(strip_rich_text).collect())
        .unwrap_or_default();
    if items.is_empty() {
        items.push(text_item("Untitled"));
    }
    items.push(text_item(COPY_SUFFIX));
    Value::Array(items)
}

fn text_item(content: &str) -> Value {
    json!({"type": "text", "text": {"content": content}})
}

/// Rich-text item with response-only fields removed.
fn strip_rich_text(item: &Value) -> Value {
    let mut item = item.clone();
    if let Some(obj) = item.as_object_mut() {
        obj.remove("plain_text");
        obj.remove("href");
    }
    item
}

/// Icons and covers hosted by Notion (`"type": "file"`) cannot be re-sent.
fn reusable_media(value: Option<&Value>) -> Option<Value> {
    let value = value?;
    match value.get("type").and_then(Value::as_str) {
        Some("emoji") | Some("external") => Some(value.clone()),
        _ => None,
    }
}

/// Parent reference usable in a create call.
fn creatable_parent(resource: &Value, allowed: &[&str]) -> NotionResult<Value> {
    let parent = resource
        .get("parent")
        .ok_or_else(|| NotionError::InvalidInput("resource has no parent".into()))?;
    let kind = parent.get("type").and_then(Value::as_str).unwrap_or_default();
    if !allowed.contains(&kind) {
        return Err(NotionError::InvalidInput(format!(
            "cannot create a copy under a {kind:?} parent"
        )));
    }
    let id = parent
        .get(kind)
        .cloned()
        .ok_or_else(|| NotionError::InvalidInput("parent id missing".into()))?;
    Ok(json!({ "type": kind, kind: id }))
}

/// Body for `POST /pages` copying `page` with `blocks` as its content.
pub fn page_copy(page: &Value, blocks: &[Value]) -> NotionResult<CopyPlan> {
    let parent = creatable_parent(page, &["database_id", "page_id"])?;

    let mut properties = Map::new();
    if let Some(source) = page.get("properties").and_then(Value::as_object) {
        for (name, prop) in source {
            let Some(kind) = prop.get("type").and_then(Value::as_str) else {
                continue;
            };
            if READ_ONLY_PROPERTY_TYPES.contains(&kind) {
                continue;
            }
            let value = if kind == "title" {
                copy_title(prop.get("title"))
            } else {
                match prop.get(kind) {
                    Some(v) => v.clone(),
                    None => continue,
                }
            };
            properties.insert(name.clone(), json!({ kind: value }));
        }
    }

    let mut children = Vec::new();
    for block in blocks {
        if children.len() == MAX_CHILDREN_PER_REQUEST {
            break;
        }
        if let Some(copy) = block_copy(block) {
            children.push(copy);
        }
    }
    let copied_children = children.len();

    let mut body = json!({
        "parent": parent,
        "properties": properties,
        "children": children,
    });
    if let Some(icon) = reusable_media(page.get("icon")) {
        body["icon"] = icon;
    }
    if let Some(cover) = reusable_media(page.get("cover")) {
        body["cover"] = cover;
    }

    Ok(CopyPlan {
        body,
        copied_children,
        skipped_children: blocks.len() - copied_children,
    })
}

/// Creatable form of a retrieved block, or `None` when it cannot be re-created.
pub fn block_copy(block: &Value) -> Option<Value> {
    let kind = block.get("type").and_then(Value::as_str)?;
    if UNCOPYABLE_BLOCK_TYPES.contains(&kind) {
        return None;
    }
    let payload = block.get(kind)?;
    // Uploaded files live on Notion-signed URLs that expire.
    if payload.get("type").and_then(Value::as_str) == Some("file") {
        return None;
    }
    Some(json!({ "object": "block", "type": kind, kind: payload.clone() }))
}

/// Body for `POST /databases` copying the schema of `database`.
///
/// Rows are not copied; `row_count` is reported as skipped children.
pub fn database_copy(database: &Value, row_count: usize) -> NotionResult<CopyPlan> {
    let parent = creatable_parent(database, &["page_id"])?;

    let mut properties = Map::new();
    if let Some(source) = database.get("properties").and_then(Value::as_object) {
        for (name, schema) in source {
            let Some(kind) = schema.get("type").and_then(Value::as_str) else {
                continue;
            };
            if UNCREATABLE_SCHEMA_TYPES.contains(&kind) {
                continue;
            }
            let config = schema.get(kind).cloned().unwrap_or_else(|| json!({}));
            properties.insert(name.clone(), json!({ kind: config }));
        }
    }
    if properties.is_empty() {
        return Err(NotionError::InvalidInput(
            "database has no copyable properties".into(),
        ));
    }

    let mut body = json!({
        "parent": parent,
        "title": copy_title(database.get("title")),
        "properties": properties,
    });
    if let Some(description) = database.get("description").and_then(Value::as_array) {
        body["description"] = Value::Array(description.iter().map(strip_rich_text).collect());
    }
    if let Some(is_inline) = database.get("is_inline").and_then(Value::as_bool) {
        body["is_inline"] = Value::Bool(is_inline);
    }
    if let Some(icon) = reusable_media(database.get("icon")) {
        body["icon"] = icon;
    }

    Ok(CopyPlan {
        body,
        copied_children: 0,
        skipped_children: row_count,
    })
}
