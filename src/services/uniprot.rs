//! UniProt REST client
//!
//! Two read-only operations against the UniProtKB search API: the reviewed
//! accession list for an organism (plain-text `list` format, cursor
//! pagination via the `Link: <...>; rel="next"` response header) and batched
//! metadata lookups (JSON format, at most 100 accessions per request to keep
//! query strings bounded).

use async_trait::async_trait;
use regex::Regex;
use serde_json::Value;

use crate::error::{CatalogError, CatalogResult};

const ACCESSION_PAGE_SIZE: usize = 500;
const METADATA_BATCH_SIZE: usize = 100;

/// Metadata for one protein entry, as extracted from the UniProt payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProteinMetadata {
    pub accession: String,
    pub protein_name: Option<String>,
    pub gene_name: Option<String>,
    pub protein_function: Option<String>,
    pub sequence: Option<String>,
}

/// Source of protein metadata, kept behind a trait so ingest can run against
/// a mock in tests.
#[async_trait]
pub trait ProteinMetadataSource: Send + Sync {
    /// Reviewed UniProt accessions for an organism's scientific name
    async fn reviewed_accessions(&self, organism: &str) -> CatalogResult<Vec<String>>;

    /// Metadata for a list of accessions
    async fn fetch_metadata(&self, accessions: &[String]) -> CatalogResult<Vec<ProteinMetadata>>;
}

pub struct UniprotClient {
    http: reqwest::Client,
    base_url: String,
    next_link: Regex,
}

impl UniprotClient {
    pub fn new(base_url: impl Into<String>) -> CatalogResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .user_agent("peptide-catalog")
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.into(),
            // <url>; rel="next" — the capture is the next page URL
            next_link: Regex::new(r#"<(.+)>; rel="next""#)
                .map_err(|e| CatalogError::configuration(format!("next-link regex: {}", e)))?,
        })
    }

    fn search_url(&self) -> String {
        format!("{}/search", self.base_url)
    }

    fn next_page(&self, headers: &reqwest::header::HeaderMap) -> Option<String> {
        let link = headers.get("link")?.to_str().ok()?;
        parse_next_link(&self.next_link, link)
    }
}

#[async_trait]
impl ProteinMetadataSource for UniprotClient {
    async fn reviewed_accessions(&self, organism: &str) -> CatalogResult<Vec<String>> {
        let mut accessions = Vec::new();

        let first = self
            .http
            .get(self.search_url())
            .query(&[
                (
                    "query",
                    format!("reviewed:true AND organism_name:{}", organism),
                ),
                ("size", ACCESSION_PAGE_SIZE.to_string()),
                ("format", "list".to_string()),
            ])
            .send()
            .await?
            .error_for_status()?;

        let mut next = self.next_page(first.headers());
        let total = first
            .headers()
            .get("x-total-results")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("?")
            .to_string();
        accessions.extend(non_empty_lines(&first.text().await?));
        tracing::debug!(
            organism,
            fetched = accessions.len(),
            total,
            "fetched accession batch"
        );

        while let Some(url) = next {
            let response = self.http.get(&url).send().await?.error_for_status()?;
            next = self.next_page(response.headers());
            accessions.extend(non_empty_lines(&response.text().await?));
            tracing::debug!(organism, fetched = accessions.len(), "fetched accession batch");
        }

        Ok(accessions)
    }

    async fn fetch_metadata(&self, accessions: &[String]) -> CatalogResult<Vec<ProteinMetadata>> {
        let mut results = Vec::with_capacity(accessions.len());

        for batch in accessions.chunks(METADATA_BATCH_SIZE) {
            let query = batch
                .iter()
                .map(|acc| format!("accession:{}", acc))
                .collect::<Vec<_>>()
                .join(" OR ");

            let body: Value = self
                .http
                .get(self.search_url())
                .query(&[
                    ("query", query),
                    ("format", "json".to_string()),
                    ("size", METADATA_BATCH_SIZE.to_string()),
                ])
                .send()
                .await?
                .error_for_status()?
                .json()
                .await?;

            results.extend(parse_search_results(&body)?);
        }

        Ok(results)
    }
}

fn non_empty_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_next_link(pattern: &Regex, header: &str) -> Option<String> {
    pattern
        .captures(header)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Extract protein metadata from a UniProt search response body
fn parse_search_results(body: &Value) -> CatalogResult<Vec<ProteinMetadata>> {
    let entries = body
        .get("results")
        .and_then(Value::as_array)
        .ok_or_else(|| CatalogError::uniprot_payload("missing 'results' array"))?;

    Ok(entries.iter().filter_map(parse_entry).collect())
}

/// One entry; entries without a primary accession are dropped
fn parse_entry(entry: &Value) -> Option<ProteinMetadata> {
    let accession = entry.get("primaryAccession")?.as_str()?.to_string();

    let protein_name = entry
        .pointer("/proteinDescription/recommendedName/fullName/value")
        .and_then(Value::as_str)
        .map(str::to_string);

    let gene_name = entry
        .pointer("/genes/0/geneName/value")
        .and_then(Value::as_str)
        .map(str::to_string);

    let protein_function = entry
        .get("comments")
        .and_then(Value::as_array)
        .and_then(|comments| {
            comments
                .iter()
                .find(|c| c.get("commentType").and_then(Value::as_str) == Some("FUNCTION"))
        })
        .and_then(|c| c.pointer("/texts/0/value"))
        .and_then(Value::as_str)
        .map(str::to_string);

    let sequence = entry
        .pointer("/sequence/value")
        .and_then(Value::as_str)
        .map(str::to_string);

    Some(ProteinMetadata {
        accession,
        protein_name,
        gene_name,
        protein_function,
        sequence,
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_parse_next_link() {
        let pattern = Regex::new(r#"<(.+)>; rel="next""#).unwrap();
        let header = r#"<https://rest.uniprot.org/uniprotkb/search?cursor=abc&size=500>; rel="next""#;
        assert_eq!(
            parse_next_link(&pattern, header).as_deref(),
            Some("https://rest.uniprot.org/uniprotkb/search?cursor=abc&size=500")
        );
        assert_eq!(parse_next_link(&pattern, "no link here"), None);
    }

    #[test]
    fn test_parse_search_results_extracts_fields() {
        let body = json!({
            "results": [{
                "primaryAccession": "P01308",
                "proteinDescription": {
                    "recommendedName": { "fullName": { "value": "Insulin" } }
                },
                "genes": [{ "geneName": { "value": "INS" } }],
                "comments": [
                    { "commentType": "SIMILARITY", "texts": [{ "value": "irrelevant" }] },
                    { "commentType": "FUNCTION", "texts": [{ "value": "Regulates glucose" }] }
                ],
                "sequence": { "value": "MALWMRLLPLL" }
            }]
        });

        let parsed = parse_search_results(&body).unwrap();
        assert_eq!(parsed.len(), 1);
        let meta = &parsed[0];
        assert_eq!(meta.accession, "P01308");
        assert_eq!(meta.protein_name.as_deref(), Some("Insulin"));
        assert_eq!(meta.gene_name.as_deref(), Some("INS"));
        assert_eq!(meta.protein_function.as_deref(), Some("Regulates glucose"));
        assert_eq!(meta.sequence.as_deref(), Some("MALWMRLLPLL"));
    }

    #[test]
    fn test_parse_search_results_tolerates_sparse_entries() {
        let body = json!({
            "results": [
                { "primaryAccession": "Q99999" },
                { "sequence": { "value": "MKT" } }
            ]
        });

        let parsed = parse_search_results(&body).unwrap();
        // The entry without an accession is dropped.
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].accession, "Q99999");
        assert!(parsed[0].protein_name.is_none());
    }

    #[test]
    fn test_parse_search_results_rejects_unexpected_shape() {
        let body = json!({ "error": "oops" });
        assert!(parse_search_results(&body).is_err());
    }

    #[test]
    fn test_non_empty_lines() {
        assert_eq!(
            non_empty_lines("P01308\n\nP01315\n"),
            vec!["P01308".to_string(), "P01315".to_string()]
        );
    }
}
