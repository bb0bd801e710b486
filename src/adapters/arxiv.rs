//! arXiv API client
//!
//! Searches the arXiv query API for the newest papers matching a keyword and
//! parses the Atom feed it returns.
//! See: https://info.arxiv.org/help/api/user-manual.html

use crate::adapters::PaperSource;
use crate::error::{DigestError, Result};
use crate::models::Paper;
use crate::utils::http::{build_client, success_body};
use async_trait::async_trait;
use quick_xml::events::Event;
use quick_xml::name::{Namespace, ResolveResult};
use quick_xml::NsReader;
use reqwest::Client;
use tracing::debug;

/// Public query endpoint
pub const DEFAULT_BASE_URL: &str = "http://export.arxiv.org/api/query";

/// Papers requested per topic when not configured otherwise
pub const DEFAULT_MAX_RESULTS: u32 = 3;

const ATOM_NS: &[u8] = b"http://www.w3.org/2005/Atom";

const SERVICE: &str = "arxiv";

/// Client for the arXiv API
pub struct ArxivClient {
    client: Client,
    base_url: String,
}

impl ArxivClient {
    /// Create a new arXiv client
    pub fn new() -> Result<Self> {
        Ok(Self::with_client(build_client()?))
    }

    /// Create a new client with an existing reqwest client
    pub fn with_client(client: Client) -> Self {
        Self {
            client,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Point the client at a different query endpoint
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Search URL for the newest `max_results` papers matching `query`
    pub fn query_url(&self, query: &str, max_results: u32) -> String {
        format!(
            "{}?search_query=all:{}&start=0&max_results={}&sortBy=submittedDate&sortOrder=descending",
            self.base_url,
            urlencoding::encode(query),
            max_results
        )
    }
}

#[async_trait]
impl PaperSource for ArxivClient {
    async fn fetch(&self, query: &str, max_results: u32) -> Result<Vec<Paper>> {
        let url = self.query_url(query, max_results);
        debug!("arXiv search: {}", url);

        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| DigestError::request(SERVICE, e))?;

        let body = success_body(SERVICE, resp).await?;
        let papers = parse_atom(&body)?;

        debug!("arXiv returned {} entries for {:?}", papers.len(), query);
        Ok(papers)
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Field {
    Title,
    Id,
    Summary,
}

impl Field {
    fn from_local_name(name: &[u8]) -> Option<Self> {
        match name {
            b"title" => Some(Self::Title),
            b"id" => Some(Self::Id),
            b"summary" => Some(Self::Summary),
            _ => None,
        }
    }

    fn tag(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Id => "id",
            Self::Summary => "summary",
        }
    }
}

/// Children collected for one `<entry>`. `Some("")` means the element was
/// present but carried no text.
#[derive(Default)]
struct EntryFields {
    title: Option<String>,
    id: Option<String>,
    summary: Option<String>,
}

impl EntryFields {
    fn slot(&mut self, field: Field) -> &mut Option<String> {
        match field {
            Field::Title => &mut self.title,
            Field::Id => &mut self.id,
            Field::Summary => &mut self.summary,
        }
    }

    fn into_paper(self, position: usize) -> Result<Paper> {
        let title = required(self.title, Field::Title, position)?;
        let url = required(self.id, Field::Id, position)?;
        let summary = required(self.summary, Field::Summary, position)?;

        Ok(Paper {
            title: newlines_to_spaces(&title),
            url,
            r#abstract: newlines_to_spaces(&summary),
        })
    }
}

/// Each line break becomes one space. CRLF and lone CR count as one break.
fn newlines_to_spaces(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n").replace('\n', " ")
}

fn required(value: Option<String>, field: Field, position: usize) -> Result<String> {
    match value {
        Some(text) if !text.is_empty() => Ok(text),
        Some(_) => Err(DigestError::feed(format!(
            "entry {} has an empty <{}>",
            position,
            field.tag()
        ))),
        None => Err(DigestError::feed(format!(
            "entry {} is missing <{}>",
            position,
            field.tag()
        ))),
    }
}

fn is_atom(ns: &ResolveResult<'_>) -> bool {
    matches!(ns, ResolveResult::Bound(Namespace(uri)) if *uri == ATOM_NS)
}

fn check_root(in_atom: bool, local_name: &[u8]) -> Result<()> {
    if in_atom && local_name == b"feed" {
        Ok(())
    } else {
        Err(DigestError::feed(format!(
            "root element <{}> is not an Atom feed",
            String::from_utf8_lossy(local_name)
        )))
    }
}

/// Parse an arXiv Atom response into papers, in document order.
///
/// Only direct `<entry>` children of the Atom `<feed>` root are read, and
/// within each entry only the first Atom `<title>`, `<id>` and `<summary>`.
/// Every newline in a title or summary becomes a single space; the id is kept
/// verbatim. Any entry missing one of the three is an error.
pub fn parse_atom(xml: &str) -> Result<Vec<Paper>> {
    let mut reader = NsReader::from_str(xml);
    let mut papers = Vec::new();
    let mut depth = 0usize;
    let mut saw_root = false;
    let mut entry: Option<EntryFields> = None;
    let mut field: Option<Field> = None;

    loop {
        let (ns, event) = reader
            .read_resolved_event()
            .map_err(|e| DigestError::feed(format!("malformed XML: {}", e)))?;
        let in_atom = is_atom(&ns);

        match event {
            Event::Start(e) => {
                depth += 1;
                let local = e.local_name();
                let name = local.as_ref();

                match depth {
                    1 => {
                        if saw_root {
                            return Err(DigestError::feed("more than one root element"));
                        }
                        check_root(in_atom, name)?;
                        saw_root = true;
                    }
                    2 if in_atom && name == b"entry" => entry = Some(EntryFields::default()),
                    3 if in_atom => {
                        let target = Field::from_local_name(name);
                        if let (Some(fields), Some(f)) = (entry.as_mut(), target) {
                            let slot = fields.slot(f);
                            if slot.is_none() {
                                *slot = Some(String::new());
                                field = Some(f);
                            }
                        }
                    }
                    _ => {}
                }
            }
            Event::Empty(e) => {
                let local = e.local_name();
                let name = local.as_ref();

                match depth {
                    0 => {
                        if saw_root {
                            return Err(DigestError::feed("more than one root element"));
                        }
                        check_root(in_atom, name)?;
                        saw_root = true;
                    }
                    1 if in_atom && name == b"entry" => {
                        return Err(DigestError::feed(format!(
                            "entry {} is empty",
                            papers.len() + 1
                        )));
                    }
                    2 if in_atom => {
                        let target = Field::from_local_name(name);
                        if let (Some(fields), Some(f)) = (entry.as_mut(), target) {
                            fields.slot(f).get_or_insert_with(String::new);
                        }
                    }
                    _ => {}
                }
            }
            Event::Text(t) if depth == 3 => {
                if let (Some(fields), Some(f)) = (entry.as_mut(), field) {
                    let text = t.unescape().map_err(|e| {
                        DigestError::feed(format!("bad text in <{}>: {}", f.tag(), e))
                    })?;
                    if let Some(slot) = fields.slot(f).as_mut() {
                        slot.push_str(&text);
                    }
                }
            }
            Event::CData(c) if depth == 3 => {
                if let (Some(fields), Some(f)) = (entry.as_mut(), field) {
                    if let Some(slot) = fields.slot(f).as_mut() {
                        slot.push_str(&String::from_utf8_lossy(&c));
                    }
                }
            }
            Event::End(_) => {
                match depth {
                    3 => field = None,
                    2 => {
                        if let Some(fields) = entry.take() {
                            papers.push(fields.into_paper(papers.len() + 1)?);
                        }
                    }
                    _ => {}
                }
                depth = depth.saturating_sub(1);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !saw_root {
        return Err(DigestError::feed("document has no root element"));
    }
    if depth > 0 {
        return Err(DigestError::feed("unexpected end of document"));
    }

    Ok(papers)
}
