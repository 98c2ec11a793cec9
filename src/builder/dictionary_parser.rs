//! Streaming parser for the structured dictionary source.
//!
//! The source is an XML document with one `<entry>` element per article:
//!
//! ```xml
//! <entry strongs="00025">
//!   <greek BETA="A)GAPA/W" unicode="ἀγαπάω" translit="agapáō"/>
//!   <pronunciation strongs="ag-ap-ah'-o"/>
//!   <strongs_derivation>perhaps from <strongsref language="GREEK" strongs="0022"/></strongs_derivation>
//!   <strongs_def>to love (in a social or moral sense)</strongs_def>
//!   <kjv_def>(be-)love(-ed).</kjv_def>
//!   <see language="GREEK" strongs="5368"/>
//! </entry>
//! ```
//!
//! Nested markup inside definition and derivation elements is reduced to
//! plain text. Cross references are kept only when their `language`
//! attribute names the dictionary's own language. Articles without a usable
//! identifier or headword are skipped and counted, never fatal.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use log::{debug, info, warn};
use quick_xml::events::{BytesStart, Event};

use crate::builder::BuilderConfig;
use crate::{LexiconError, Result};

const ENTRY_TAG: &[u8] = b"entry";
const WORD_TAG: &[u8] = b"greek";
const PRONUNCIATION_TAG: &[u8] = b"pronunciation";
const DERIVATION_TAG: &[u8] = b"strongs_derivation";
const PRIMARY_DEFINITION_TAG: &[u8] = b"strongs_def";
const SECONDARY_DEFINITION_TAG: &[u8] = b"kjv_def";
const SEE_TAG: &[u8] = b"see";
const INLINE_REF_TAG: &[u8] = b"strongsref";

/// A raw dictionary article before corpus enrichment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DictionaryArticle {
    pub id: String,
    pub headword: String,
    pub transliteration: Option<String>,
    pub beta_code: Option<String>,
    pub pronunciation: Option<String>,
    pub derivation: Option<String>,
    pub definition_primary: Option<String>,
    pub definition_secondary: Option<String>,
    pub cross_refs: Vec<String>,
}

/// Counters collected while parsing a dictionary source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseReport {
    pub articles_parsed: usize,
    pub articles_skipped: usize,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum TextField {
    Derivation,
    Primary,
    Secondary,
}

#[derive(Default)]
struct ArticleState {
    raw_id: String,
    headword: String,
    transliteration: String,
    beta_code: String,
    pronunciation: String,
    derivation: String,
    definition_primary: String,
    definition_secondary: String,
    see_refs: Vec<String>,
    inline_refs: Vec<String>,
    text_field: Option<TextField>,
    /// Open elements below `<entry>`; 0 means a direct child is being read
    depth: usize,
    defect: Option<String>,
}

impl ArticleState {
    fn text_mut(&mut self) -> Option<&mut String> {
        match self.text_field? {
            TextField::Derivation => Some(&mut self.derivation),
            TextField::Primary => Some(&mut self.definition_primary),
            TextField::Secondary => Some(&mut self.definition_secondary),
        }
    }

    fn push_text(&mut self, text: &str) {
        if let Some(target) = self.text_mut() {
            target.push_str(text);
        }
    }

    /// Nested markup inside a text field separates words.
    fn push_separator(&mut self) {
        self.push_text(" ");
    }
}

fn get_node_attr_str(attrs: &[(String, String)], key: &str) -> String {
    for (attr_key, attr_value) in attrs {
        if attr_key == key {
            return attr_value.clone();
        }
    }
    String::new()
}

fn collect_attrs(e: &BytesStart) -> Result<Vec<(String, String)>> {
    let mut attrs = Vec::new();
    for attr_result in e.attributes() {
        let attr = attr_result
            .map_err(|e| LexiconError::malformed_record(format!("Failed to parse XML attributes: {}", e)))?;
        let key = std::str::from_utf8(attr.key.as_ref())?.to_string();
        let raw_value = std::str::from_utf8(attr.value.as_ref())?;
        let value = htmlescape::decode_html(raw_value).unwrap_or_else(|_| raw_value.to_string());
        attrs.push((key, value));
    }
    Ok(attrs)
}

fn collapse_whitespace(text: &str) -> Option<String> {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() { None } else { Some(collapsed) }
}

fn optional(value: String) -> Option<String> {
    let value = value.trim().to_string();
    if value.is_empty() { None } else { Some(value) }
}

/// Parses dictionary sources into [`DictionaryArticle`]s.
#[derive(Debug, Clone)]
pub struct DictionaryParser {
    id_prefix: String,
    cross_ref_language: String,
}

impl Default for DictionaryParser {
    fn default() -> Self {
        Self::from_config(&BuilderConfig::default())
    }
}

impl DictionaryParser {
    /// Creates a parser.
    ///
    /// # Arguments
    ///
    /// * `id_prefix` - Letter prepended to numeric identifiers (`"G"` gives `G25`)
    /// * `cross_ref_language` - Value of the `language` attribute that marks same-language references
    pub fn new(id_prefix: &str, cross_ref_language: &str) -> Self {
        Self {
            id_prefix: id_prefix.to_string(),
            cross_ref_language: cross_ref_language.to_string(),
        }
    }

    pub fn from_config(config: &BuilderConfig) -> Self {
        Self::new(&config.id_prefix, &config.cross_ref_language)
    }

    /// Parses a dictionary file.
    ///
    /// # Errors
    ///
    /// Returns `SourceNotFound` if the file does not exist, or an I/O error
    /// if it cannot be opened. Bad articles never produce an error.
    pub fn parse_file<P: AsRef<Path>>(&self, path: P) -> Result<(Vec<DictionaryArticle>, ParseReport)> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(LexiconError::source_not_found(path.display().to_string()));
        }
        info!("Parsing dictionary source: {}", path.display());
        let reader = BufReader::new(File::open(path)?);
        self.parse_reader(reader)
    }

    /// Parses a dictionary held in memory.
    pub fn parse_str(&self, xml: &str) -> Result<(Vec<DictionaryArticle>, ParseReport)> {
        self.parse_reader(xml.as_bytes())
    }

    /// Parses a dictionary in a single forward pass over `input`.
    ///
    /// A syntax error in the document ends the pass: the article being read
    /// is counted as skipped and everything parsed before it is kept.
    pub fn parse_reader<R: BufRead>(&self, input: R) -> Result<(Vec<DictionaryArticle>, ParseReport)> {
        let mut reader = quick_xml::Reader::from_reader(input);
        let mut buf = Vec::new();
        let mut articles = Vec::new();
        let mut report = ParseReport::default();
        let mut current: Option<ArticleState> = None;

        loop {
            let position = reader.buffer_position();
            let event = match reader.read_event_into(&mut buf) {
                Ok(event) => event,
                Err(e) => {
                    warn!("Dictionary XML error near byte {}: {}. Stopping parse.", position, e);
                    if current.is_some() {
                        report.articles_skipped += 1;
                    }
                    break;
                }
            };

            match event {
                Event::Start(e) => {
                    let name = e.name();
                    if name.as_ref() == ENTRY_TAG {
                        current = Some(self.start_article(&e));
                    } else if let Some(state) = current.as_mut() {
                        self.handle_element(state, &e, false);
                        state.depth += 1;
                    }
                }
                Event::Empty(e) => {
                    let name = e.name();
                    if name.as_ref() == ENTRY_TAG {
                        let state = self.start_article(&e);
                        self.finish_article(state, position, &mut articles, &mut report);
                    } else if let Some(state) = current.as_mut() {
                        self.handle_element(state, &e, true);
                    }
                }
                Event::End(e) => {
                    let name = e.name();
                    let name = name.as_ref();
                    if name == ENTRY_TAG {
                        if let Some(state) = current.take() {
                            self.finish_article(state, position, &mut articles, &mut report);
                        }
                    } else if let Some(state) = current.as_mut() {
                        state.depth = state.depth.saturating_sub(1);
                        if name == DERIVATION_TAG || name == PRIMARY_DEFINITION_TAG || name == SECONDARY_DEFINITION_TAG {
                            state.text_field = None;
                        } else {
                            state.push_separator();
                        }
                    }
                }
                Event::Text(e) => {
                    if let Some(state) = current.as_mut() {
                        match std::str::from_utf8(&e) {
                            Ok(text) => state.push_text(text),
                            Err(err) => state.defect = Some(format!("Invalid UTF-8 in text: {}", err)),
                        }
                    }
                }
                Event::CData(e) => {
                    if let Some(state) = current.as_mut() {
                        state.push_text(&String::from_utf8_lossy(&e));
                    }
                }
                Event::GeneralRef(e) => {
                    if let Some(state) = current.as_mut() {
                        let reference = format!("&{};", String::from_utf8_lossy(&e));
                        let decoded = htmlescape::decode_html(&reference).unwrap_or(reference);
                        state.push_text(&decoded);
                    }
                }
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        info!(
            "Parsed {} dictionary articles ({} skipped)",
            report.articles_parsed, report.articles_skipped
        );
        Ok((articles, report))
    }

    fn start_article(&self, e: &BytesStart) -> ArticleState {
        let mut state = ArticleState::default();
        match collect_attrs(e) {
            Ok(attrs) => state.raw_id = get_node_attr_str(&attrs, "strongs"),
            Err(err) => state.defect = Some(err.to_string()),
        }
        state
    }

    fn handle_element(&self, state: &mut ArticleState, e: &BytesStart, is_empty: bool) {
        let name = e.name();
        let name = name.as_ref();
        let text_field = match name {
            DERIVATION_TAG => Some(TextField::Derivation),
            PRIMARY_DEFINITION_TAG => Some(TextField::Primary),
            SECONDARY_DEFINITION_TAG => Some(TextField::Secondary),
            _ => None,
        };
        if text_field.is_some() {
            if !is_empty {
                state.text_field = text_field;
            }
            return;
        }

        let attrs = match collect_attrs(e) {
            Ok(attrs) => attrs,
            Err(err) => {
                state.defect = Some(err.to_string());
                return;
            }
        };
        match name {
            WORD_TAG if state.depth == 0 => {
                state.headword = get_node_attr_str(&attrs, "unicode");
                state.transliteration = get_node_attr_str(&attrs, "translit");
                state.beta_code = get_node_attr_str(&attrs, "BETA");
            }
            PRONUNCIATION_TAG if state.depth == 0 => {
                state.pronunciation = get_node_attr_str(&attrs, "strongs");
            }
            SEE_TAG | INLINE_REF_TAG => {
                if let Some(id) = self.cross_ref_id(&attrs) {
                    if name == SEE_TAG {
                        state.see_refs.push(id);
                    } else {
                        state.inline_refs.push(id);
                    }
                }
            }
            _ => {}
        }
        state.push_separator();
    }

    fn cross_ref_id(&self, attrs: &[(String, String)]) -> Option<String> {
        let language = get_node_attr_str(attrs, "language");
        if !language.eq_ignore_ascii_case(&self.cross_ref_language) {
            return None;
        }
        let number = get_node_attr_str(attrs, "strongs");
        let number = number.trim().trim_start_matches('0');
        if number.is_empty() {
            return None;
        }
        Some(format!("{}{}", self.id_prefix, number))
    }

    fn finish_article(
        &self,
        state: ArticleState,
        position: u64,
        articles: &mut Vec<DictionaryArticle>,
        report: &mut ParseReport,
    ) {
        match self.build_article(state) {
            Ok(article) => {
                articles.push(article);
                report.articles_parsed += 1;
            }
            Err(e) => {
                debug!("Skipping dictionary article near byte {}: {}", position, e);
                report.articles_skipped += 1;
            }
        }
    }

    fn build_article(&self, state: ArticleState) -> Result<DictionaryArticle> {
        if let Some(defect) = state.defect {
            return Err(LexiconError::malformed_record(defect));
        }
        let number = state.raw_id.trim().trim_start_matches('0');
        if number.is_empty() {
            return Err(LexiconError::malformed_record("Article without identifier"));
        }
        if !number.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(LexiconError::malformed_record(format!("Unparseable identifier: {}", state.raw_id)));
        }
        let headword = state.headword.trim().to_string();
        if headword.is_empty() {
            return Err(LexiconError::malformed_record(format!("Article {} has no headword", number)));
        }

        let mut cross_refs: Vec<String> = Vec::with_capacity(state.see_refs.len() + state.inline_refs.len());
        for id in state.see_refs.into_iter().chain(state.inline_refs) {
            if !cross_refs.contains(&id) {
                cross_refs.push(id);
            }
        }

        Ok(DictionaryArticle {
            id: format!("{}{}", self.id_prefix, number),
            headword,
            transliteration: optional(state.transliteration),
            beta_code: optional(state.beta_code),
            pronunciation: optional(state.pronunciation),
            derivation: collapse_whitespace(&state.derivation),
            definition_primary: collapse_whitespace(&state.definition_primary),
            definition_secondary: collapse_whitespace(&state.definition_secondary),
            cross_refs,
        })
    }
}
