//! Content budgeting: turning crawled pages into prompt-sized text

use crate::crawler::PageRecord;

/// Truncates to at most `max_chars` characters, appending `...` when text was cut
///
/// Cuts on a character boundary, never inside a multi-byte sequence.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => format!("{}...", &text[..byte_idx]),
        None => text.to_string(),
    }
}

/// Renders one block per page: index, URL, title and a content preview
///
/// Blocks are separated by a blank line. Page indices match the numbering
/// the page-content tool accepts.
pub fn page_digest(pages: &[PageRecord], preview_chars: usize) -> String {
    pages
        .iter()
        .enumerate()
        .map(|(i, page)| {
            format!(
                "Page {}:\nURL: {}\nTitle: {}\nContent Preview: {}",
                i,
                page.url,
                page.title.as_deref().unwrap_or("(untitled)"),
                truncate_chars(&page.content, preview_chars)
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Builds the research instruction handed to the report agent
pub fn research_prompt(target_url: &str, pages: &[PageRecord], preview_chars: usize) -> String {
    format!(
        "I have crawled {count} pages from {url}. Here is the initial content:\n\n\
         {digest}\n\n\
         Please analyze this content and:\n\
         1. Review the content (use get_page_content for full page content if needed)\n\
         2. Use search_web to find additional relevant information\n\
         3. Create a detailed report synthesizing all sources\n\n\
         Focus on information valuable for our sales team, including:\n\
         - Company overview (mission, products/services, market position)\n\
         - Target customers and unique selling points\n\
         - Recent news and industry trends\n\
         - Potential sales approaches",
        count = pages.len(),
        url = target_url,
        digest = page_digest(pages, preview_chars),
    )
}
