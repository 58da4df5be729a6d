use serde::Deserialize;

use crate::errors::ProviderError;

/// Document returned by every API call
///
/// ```xml
/// <bierdopje>
///   <response>
///     <status>true</status>
///     <results><result>...</result></results>
///   </response>
/// </bierdopje>
/// ```
#[derive(Debug, Default, Deserialize)]
pub struct ResponseDocument {
    #[serde(default)]
    pub response: ResponseNode,
}

/// The `response` node of a document
#[derive(Debug, Default, Deserialize)]
pub struct ResponseNode {
    /// "true" when the call produced results, "false" when nothing was found
    #[serde(default)]
    pub status: Option<String>,

    /// Present when the service reports an error inside a 200 response
    #[serde(default)]
    pub error_msg: Option<String>,

    #[serde(default)]
    pub results: ResultList,
}

/// The `results` node of a response
#[derive(Debug, Default, Deserialize)]
pub struct ResultList {
    #[serde(rename = "result", default)]
    pub entries: Vec<ResultEntry>,
}

/// One `result` node; which fields are set depends on the call
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResultEntry {
    /// Show id, set by show searches
    #[serde(default)]
    pub showid: Option<String>,

    /// Display name, set by show searches
    #[serde(default)]
    pub showname: Option<String>,

    /// Release file name, set by subtitle searches
    #[serde(default)]
    pub filename: Option<String>,

    /// Download link, set by subtitle searches
    #[serde(default)]
    pub downloadlink: Option<String>,
}

impl ResponseDocument {
    /// Parse a response body, honoring the encoding its XML declaration names
    pub fn parse(body: &[u8]) -> Result<Self, ProviderError> {
        Ok(quick_xml::de::from_reader(body)?)
    }

    /// Error message embedded by the service, if any
    pub fn error_message(&self) -> Option<&str> {
        self.response.error_msg.as_deref().map(str::trim)
    }

    /// Whether the service reported results; `status` false means not found
    pub fn has_results(&self) -> bool {
        self.response
            .status
            .as_deref()
            .map_or(true, |status| !status.trim().eq_ignore_ascii_case("false"))
    }

    /// Result entries, in response order
    pub fn results(&self) -> &[ResultEntry] {
        &self.response.results.entries
    }
}

impl ResultEntry {
    /// Show id as a number
    pub fn show_id(&self) -> Result<u32, ProviderError> {
        let raw = required(&self.showid, "showid")?;
        raw.parse()
            .map_err(|e| ProviderError::ParseError(format!("Invalid showid '{}': {}", raw, e)))
    }

    /// Show name, empty when absent
    pub fn show_name(&self) -> &str {
        self.showname.as_deref().map_or("", str::trim)
    }

    /// Release file name of a subtitle result
    pub fn file_name(&self) -> Result<&str, ProviderError> {
        required(&self.filename, "filename")
    }

    /// Download link of a subtitle result
    pub fn download_link(&self) -> Result<&str, ProviderError> {
        required(&self.downloadlink, "downloadlink")
    }
}

fn required<'a>(value: &'a Option<String>, field: &str) -> Result<&'a str, ProviderError> {
    value
        .as_deref()
        .map(str::trim)
        .ok_or_else(|| ProviderError::ParseError(format!("Result is missing its {} node", field)))
}
