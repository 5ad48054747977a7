use log::info;
use std::collections::HashMap;
use std::path::Path;

use crate::config::RenderConfig;
use crate::error::{CommentsError, Result};
use crate::types::{AuthorInfo, Comment, TitleResult};

/// Keep the part of a page title before the first `|`, trimmed.
pub fn clean_title(raw: &str) -> &str {
    raw.split('|').next().unwrap_or(raw).trim()
}

/// The resolved display name, or the handle when GitHub has none.
pub fn display_name<'a>(handle: &'a str, info: &'a AuthorInfo) -> &'a str {
    match info.name.as_deref() {
        Some(name) if !name.is_empty() => name,
        _ => handle,
    }
}

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// A comment paired with everything needed to display it.
struct Entry<'a> {
    comment: &'a Comment,
    author: &'a AuthorInfo,
    name: &'a str,
    title: &'a str,
}

/// Pairs comments and titles by position. When the lists differ in length
/// the extra entries of the longer one are ignored.
fn entries<'a>(
    comments: &'a [Comment],
    titles: &'a [TitleResult],
    authors: &'a HashMap<String, AuthorInfo>,
) -> Result<Vec<Entry<'a>>> {
    comments
        .iter()
        .zip(titles)
        .map(|(comment, title)| {
            let author = authors
                .get(&comment.author)
                .ok_or_else(|| CommentsError::MissingAuthor(comment.author.clone()))?;
            Ok(Entry {
                comment,
                author,
                name: display_name(&comment.author, author),
                title: clean_title(&title.title),
            })
        })
        .collect()
}

pub fn render_html(
    comments: &[Comment],
    titles: &[TitleResult],
    authors: &HashMap<String, AuthorInfo>,
    config: &RenderConfig,
) -> Result<String> {
    let mut html = String::new();
    html.push_str("\n<div class=\"latest-comments\">\n");
    html.push_str(&format!(
        "<div class=\"comments-title\">{}</div>\n",
        escape_html(&config.heading)
    ));

    for entry in entries(comments, titles, authors)? {
        html.push_str(&format!(
            "<div class=\"comment-item\">\n<a href=\"{}\">{}</a>\n {} \n<a href=\"{}\">{}</a>\n</div>\n",
            escape_html(&entry.author.url),
            escape_html(entry.name),
            escape_html(&config.connector),
            escape_html(&entry.comment.post_url),
            escape_html(entry.title),
        ));
    }

    html.push_str("</div>\n");
    Ok(html)
}

/// Plain-text listing of every comment, one blank line between records.
pub fn render_report(
    comments: &[Comment],
    titles: &[TitleResult],
    authors: &HashMap<String, AuthorInfo>,
) -> Result<String> {
    let mut report = String::new();

    for entry in entries(comments, titles, authors)? {
        report.push_str(&format!("Post_url: {}\n", entry.comment.post_url));
        report.push_str(&format!("Post title: {}\n", entry.title));
        report.push_str(&format!("Discussion URL: {}\n", entry.comment.discussion_url));
        report.push_str(&format!("Author URL: {}\n", entry.author.url));
        report.push_str(&format!("Author Name: {}\n", entry.name));
        report.push_str(&format!("Comment URL: {}\n", entry.comment.comment_url));
        report.push('\n');
    }

    Ok(report)
}

/// Overwrites `path` with the rendered fragment.
pub fn write_html(path: &Path, html: &str) -> Result<()> {
    std::fs::write(path, html)?;
    info!("Wrote {} bytes to {}", html.len(), path.display());
    Ok(())
}
