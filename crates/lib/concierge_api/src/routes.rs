//! Route paths.

pub const API_HEALTH: &str = "/api/health";
pub const API_SITE_CONFIG: &str = "/api/site-config";
pub const API_INQUIRY: &str = "/api/inquiry";

pub const API_AUTH_SESSION: &str = "/api/auth/session";
pub const API_AUTH_LOGOUT: &str = "/api/auth/logout";

pub const WORKSPACE: &str = "/workspace";

pub const NOTION_DATABASES: &str = "/api/notion/databases";
pub const NOTION_DATABASE: &str = "/api/notion/databases/{id}";
pub const NOTION_DATABASE_DUPLICATE: &str = "/api/notion/databases/{id}/duplicate";
pub const NOTION_DATABASE_CHILDREN: &str = "/api/notion/databases/{id}/children";

pub const NOTION_PAGES: &str = "/api/notion/pages";
pub const NOTION_PAGE: &str = "/api/notion/pages/{id}";
pub const NOTION_PAGE_DUPLICATE: &str = "/api/notion/pages/{id}/duplicate";
pub const NOTION_PAGE_CHILDREN: &str = "/api/notion/pages/{id}/children";

pub const NOTION_SEARCH: &str = "/api/notion/search";
