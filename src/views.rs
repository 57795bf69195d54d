//! HTML presentation layer.
//!
//! Pages are rendered from typed view models by plain string assembly; every
//! dynamic value goes through [`html_escape`], and values embedded in link
//! query strings are additionally percent-encoded.

use crate::registry::{FileEntry, SharedDirectory};

const STYLE: &str = "\
body { font-family: Arial, sans-serif; max-width: 800px; margin: 50px auto; padding: 20px; background-color: #f5f5f5; }\
.container { background-color: white; padding: 30px; border-radius: 10px; box-shadow: 0 2px 10px rgba(0,0,0,0.1); }\
h1 { color: #333; text-align: center; margin-bottom: 30px; }\
.entry-list { list-style: none; padding: 0; }\
.entry { padding: 10px; margin: 5px 0; background-color: #f8f9fa; border-radius: 5px; border-left: 4px solid #007bff; }\
.entry a { text-decoration: none; color: #007bff; font-weight: 500; }\
.entry .meta { color: #6c757d; font-size: 0.85em; }\
.entry.unavailable { border-left-color: #dc3545; color: #6c757d; }\
.directory-path { background-color: #e9ecef; padding: 10px; border-radius: 5px; margin-bottom: 20px; font-family: monospace; color: #495057; }\
.empty { text-align: center; color: #6c757d; font-style: italic; padding: 20px; }";

/// Overview of all registered directories (multi-directory variant).
pub struct DirListPage<'a> {
    pub title: &'a str,
    pub dirs: &'a [SharedDirectory],
}

impl DirListPage<'_> {
    pub fn render(&self) -> String {
        let mut body = String::new();

        if self.dirs.is_empty() {
            body.push_str("<div class=\"empty\">No directories are configured for sharing.</div>");
        } else {
            body.push_str("<ul class=\"entry-list\">");
            for dir in self.dirs {
                let display = dir.path.display().to_string();
                if dir.available {
                    let plural = if dir.file_count == 1 { "file" } else { "files" };
                    body.push_str(&format!(
                        "<li class=\"entry\"><a href=\"/browse?dir={}\">&#128193; {}</a> \
                         <span class=\"meta\">{} {}</span></li>",
                        urlencoding::encode(&display),
                        html_escape(&display),
                        dir.file_count,
                        plural,
                    ));
                } else {
                    body.push_str(&format!(
                        "<li class=\"entry unavailable\">&#128193; {} \
                         <span class=\"meta\">unavailable</span></li>",
                        html_escape(&display),
                    ));
                }
            }
            body.push_str("</ul>");
        }

        page(self.title, &body)
    }
}

/// File listing for one shared directory.
pub struct FileListPage<'a> {
    pub title: &'a str,
    /// Directory path as configured, shown and used in links verbatim.
    pub dir: &'a str,
    pub files: &'a [FileEntry],
    /// Link files as `/download?dir=..&file=..` when true, `/download/<name>`
    /// when false (single-directory variant).
    pub query_links: bool,
}

impl FileListPage<'_> {
    pub fn render(&self) -> String {
        let mut body = format!(
            "<div class=\"directory-path\"><strong>Shared Directory:</strong> {}</div>",
            html_escape(self.dir)
        );

        if self.files.is_empty() {
            body.push_str("<div class=\"empty\">No files found in the shared directory.</div>");
        } else {
            body.push_str("<ul class=\"entry-list\">");
            for file in self.files {
                let href = if self.query_links {
                    format!(
                        "/download?dir={}&file={}",
                        urlencoding::encode(self.dir),
                        urlencoding::encode(&file.name)
                    )
                } else {
                    format!("/download/{}", urlencoding::encode(&file.name))
                };
                body.push_str(&format!(
                    "<li class=\"entry\"><a href=\"{}\">&#128196; {}</a></li>",
                    href,
                    html_escape(&file.name),
                ));
            }
            body.push_str("</ul>");
        }

        page(self.title, &body)
    }
}

/// Minimal error body embedding the triggering message.
pub fn error_page(message: &str) -> String {
    format!("<h1>Error: {}</h1>", html_escape(message))
}

fn page(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html><html><head><title>{title}</title><style>{STYLE}</style></head>\
         <body><div class=\"container\"><h1>&#128193; {title}</h1>{body}</div></body></html>",
        title = html_escape(title),
        body = body,
    )
}

/// Escape HTML entities
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}
