//! Sitemap rendering.
//!
//! Turns the merged node sequence of one sitemap into either a urlset or,
//! when the nodes do not fit on one page and no page was requested, a
//! sitemap index linking to every page.
//!
//! # Sitemap Format
//!
//! ```xml
//! <?xml version="1.0" encoding="UTF-8"?>
//! <urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
//!   <url>
//!     <loc>https://example.com/</loc>
//!     <lastmod>2025-01-01T00:00+00:00</lastmod>
//!     <changefreq>weekly</changefreq>
//!     <priority>0.8</priority>
//!   </url>
//! </urlset>
//! ```
//!
//! ```xml
//! <?xml version="1.0" encoding="UTF-8"?>
//! <sitemapindex xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
//!   <sitemap>
//!     <loc>https://example.com/sitemap.xml?page=1</loc>
//!     <lastmod>2025-01-01T00:00+00:00</lastmod>
//!   </sitemap>
//! </sitemapindex>
//! ```

use anyhow::{Context, Result};
use quick_xml::{
    Writer,
    events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event},
};
use url::Url;

use crate::etag::compute_etag;
use crate::node::{SitemapNode, Timestamp, format_lastmod};
use crate::pager::Page;
use crate::uri::{escape_uri, with_query_param};

pub const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

/// Root element of a rendered document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    UrlSet,
    Index,
}

/// Rendered sitemap plus what an HTTP layer needs for caching.
#[derive(Debug, Clone)]
pub struct SitemapDocument {
    pub kind: DocumentKind,
    pub content: String,
    /// Most recent `<lastmod>` in the document, if it has any entries.
    pub last_modified: Option<Timestamp>,
}

impl SitemapDocument {
    pub fn etag(&self) -> String {
        compute_etag(&self.content)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RenderOptions {
    /// Page size used when the caller passes no count.
    pub page_size: usize,
    /// Write everything on one line.
    pub minify: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            page_size: crate::config::DEFAULT_PAGE_SIZE,
            minify: false,
        }
    }
}

/// One `<sitemap>` entry of an index.
struct IndexEntry {
    loc: Url,
    lastmod: Timestamp,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Renderer {
    options: RenderOptions,
}

impl Renderer {
    pub const fn new(options: RenderOptions) -> Self {
        Self { options }
    }

    pub const fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Render `source` as seen at `page`/`count`.
    ///
    /// `base` is the sitemap's own URL; index entries link back to it with a
    /// `page` query parameter.
    pub fn render(
        &self,
        source: &[SitemapNode],
        base: &Url,
        page: Option<usize>,
        count: Option<usize>,
    ) -> Result<SitemapDocument> {
        let first = Page::new(source, page, count, self.options.page_size);

        if first.is_partial() && page.is_none() {
            let entries = self.index_entries(source, base, first.page_count(), first.page_size());
            self.render_index(&entries)
        } else {
            self.render_urlset(first.items())
        }
    }

    fn index_entries(
        &self,
        source: &[SitemapNode],
        base: &Url,
        page_count: usize,
        page_size: usize,
    ) -> Vec<IndexEntry> {
        // Linked pages must slice the same way when a custom count was asked for
        let base = if page_size == self.options.page_size {
            base.clone()
        } else {
            with_query_param(base, "count", &page_size.to_string())
        };

        (1..=page_count)
            .filter_map(|i| {
                let page = Page::new(source, Some(i), Some(page_size), self.options.page_size);
                let lastmod = page.iter().map(|node| *node.last_modified()).max()?;
                Some(IndexEntry {
                    loc: with_query_param(&base, "page", &i.to_string()),
                    lastmod,
                })
            })
            .collect()
    }

    fn render_index(&self, entries: &[IndexEntry]) -> Result<SitemapDocument> {
        let mut writer = self.writer()?;
        start_root(&mut writer, "sitemapindex")?;
        for entry in entries {
            writer.write_event(Event::Start(BytesStart::new("sitemap")))?;
            text_element(&mut writer, "loc", &escape_uri(entry.loc.as_str()))?;
            text_element(&mut writer, "lastmod", &format_lastmod(&entry.lastmod))?;
            writer.write_event(Event::End(BytesEnd::new("sitemap")))?;
        }
        writer.write_event(Event::End(BytesEnd::new("sitemapindex")))?;

        Ok(SitemapDocument {
            kind: DocumentKind::Index,
            content: self.finish(writer)?,
            last_modified: entries.iter().map(|e| e.lastmod).max(),
        })
    }

    fn render_urlset(&self, nodes: &[SitemapNode]) -> Result<SitemapDocument> {
        let mut writer = self.writer()?;
        start_root(&mut writer, "urlset")?;
        for node in nodes {
            writer.write_event(Event::Start(BytesStart::new("url")))?;
            text_element(&mut writer, "loc", &escape_uri(node.url()))?;
            text_element(&mut writer, "lastmod", &format_lastmod(node.last_modified()))?;
            text_element(&mut writer, "changefreq", node.frequency().as_str())?;
            text_element(&mut writer, "priority", &node.priority().to_string())?;
            writer.write_event(Event::End(BytesEnd::new("url")))?;
        }
        writer.write_event(Event::End(BytesEnd::new("urlset")))?;

        Ok(SitemapDocument {
            kind: DocumentKind::UrlSet,
            content: self.finish(writer)?,
            last_modified: nodes.iter().map(|n| *n.last_modified()).max(),
        })
    }

    fn writer(&self) -> Result<Writer<Vec<u8>>> {
        let buffer = Vec::with_capacity(4096);
        let mut writer = if self.options.minify {
            Writer::new(buffer)
        } else {
            Writer::new_with_indent(buffer, b' ', 2)
        };
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        Ok(writer)
    }

    fn finish(&self, writer: Writer<Vec<u8>>) -> Result<String> {
        let mut bytes = writer.into_inner();
        if !self.options.minify {
            bytes.push(b'\n');
        }
        String::from_utf8(bytes).context("sitemap xml is not valid UTF-8")
    }
}

fn start_root(writer: &mut Writer<Vec<u8>>, name: &str) -> Result<()> {
    let root = BytesStart::new(name).with_attributes([("xmlns", SITEMAP_NS)]);
    writer.write_event(Event::Start(root))?;
    Ok(())
}

/// Write `<name>text</name>`, XML-escaping `text`.
fn text_element(writer: &mut Writer<Vec<u8>>, name: &str, text: &str) -> Result<()> {
    writer.write_event(Event::Start(BytesStart::new(name)))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}
