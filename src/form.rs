//! Form discovery and payload assembly
//!
//! Every conversion form on the page:
//! - names its target operation in a hidden `feature` input
//! - posts to `/api/<feature>` as multipart data
//! - may carry several submit buttons whose name/value pick an action
//!   variant (e.g. `preview=true` vs. a plain download)

use std::path::PathBuf;

use anyhow::Result;
use scraper::{ElementRef, Html, Selector};

/// Name of the hidden input that selects the server-side operation.
pub const FEATURE_FIELD: &str = "feature";

/// API path for a feature.
pub fn endpoint_for(feature: &str) -> String {
    format!("/api/{feature}")
}

/// A submit control (`<button>` or `<input type="submit">`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submitter {
    pub name: String,
    pub value: String,
    /// Visible label, for listings.
    pub label: String,
}

impl Submitter {
    /// A control with an explicit name/value, as passed on the command line.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            label: name.clone(),
            name,
            value: value.into(),
        }
    }
}

/// A form parsed from the application page.
#[derive(Debug, Clone)]
pub struct PageForm {
    /// `id` attribute, or `form-<index>` when absent.
    pub id: String,
    /// Value of the hidden `feature` input.
    pub feature: Option<String>,
    /// `/api/<feature>`; `None` when the form has no feature field.
    pub endpoint: Option<String>,
    /// Successful text controls in document order (checkboxes/radios only
    /// when checked, submit controls excluded).
    pub fields: Vec<(String, String)>,
    /// Names of `<input type="file">` controls.
    pub file_inputs: Vec<String>,
    /// Submit controls in document order.
    pub submitters: Vec<Submitter>,
}

/// One multipart part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PartValue {
    Text(String),
    /// File read from disk at send time.
    File(PathBuf),
    /// File control left empty: sent with an empty filename and no bytes.
    EmptyFile,
}

/// Ordered multipart payload for a submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormPayload {
    pub parts: Vec<(String, PartValue)>,
}

impl FormPayload {
    /// First text value for `name`.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.parts.iter().find_map(|(n, v)| match v {
            PartValue::Text(t) if n == name => Some(t.as_str()),
            _ => None,
        })
    }

    pub fn push_text(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.parts.push((name.into(), PartValue::Text(value.into())));
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| anyhow::anyhow!("{:?}", e))
}

impl PageForm {
    /// Parse all forms from HTML.
    pub fn parse_all(html: &str) -> Result<Vec<Self>> {
        let document = Html::parse_document(html);
        let form_selector = selector("form")?;
        let control_selector = selector("input, select, textarea, button")?;
        let option_selector = selector("option")?;

        let mut forms = Vec::new();

        for (index, form_elem) in document.select(&form_selector).enumerate() {
            let id = form_elem
                .value()
                .attr("id")
                .map_or_else(|| format!("form-{index}"), str::to_string);

            let mut feature = None;
            let mut fields = Vec::new();
            let mut file_inputs = Vec::new();
            let mut submitters = Vec::new();

            for control in form_elem.select(&control_selector) {
                let elem = control.value();
                let name = elem.attr("name").unwrap_or("");
                if elem.attr("disabled").is_some() {
                    continue;
                }

                match elem.name() {
                    "button" => {
                        if elem.attr("type").unwrap_or("submit") == "submit" {
                            submitters.push(submitter(control, name));
                        }
                    }
                    "select" if !name.is_empty() => {
                        fields.push((name.to_string(), selected_option(control, &option_selector)));
                    }
                    "textarea" if !name.is_empty() => {
                        fields.push((name.to_string(), control.text().collect()));
                    }
                    "input" => {
                        let input_type = elem.attr("type").unwrap_or("text").to_lowercase();
                        let value = elem.attr("value").unwrap_or("");
                        match input_type.as_str() {
                            "submit" => submitters.push(submitter(control, name)),
                            "file" if !name.is_empty() => file_inputs.push(name.to_string()),
                            "checkbox" | "radio" => {
                                if !name.is_empty() && elem.attr("checked").is_some() {
                                    let value = elem.attr("value").unwrap_or("on");
                                    fields.push((name.to_string(), value.to_string()));
                                }
                            }
                            "reset" | "button" | "image" | "file" => {}
                            _ if !name.is_empty() => {
                                if name == FEATURE_FIELD && feature.is_none() {
                                    feature = Some(value.to_string());
                                }
                                fields.push((name.to_string(), value.to_string()));
                            }
                            _ => {}
                        }
                    }
                    _ => {}
                }
            }

            let endpoint = feature.as_deref().map(endpoint_for);

            forms.push(PageForm {
                id,
                feature,
                endpoint,
                fields,
                file_inputs,
                submitters,
            });
        }

        Ok(forms)
    }

    /// Find the form targeting `feature`.
    pub fn find_by_feature<'a>(forms: &'a [Self], feature: &str) -> Option<&'a Self> {
        forms.iter().find(|f| f.feature.as_deref() == Some(feature))
    }

    /// A synthetic form for a feature, used when no page is available.
    pub fn for_feature(feature: &str) -> Self {
        PageForm {
            id: feature.to_string(),
            feature: Some(feature.to_string()),
            endpoint: Some(endpoint_for(feature)),
            fields: vec![(FEATURE_FIELD.to_string(), feature.to_string())],
            file_inputs: Vec::new(),
            submitters: Vec::new(),
        }
    }

    /// Build the multipart payload.
    ///
    /// User fields replace page fields of the same name, user files fill
    /// the matching file controls, and the submitter's name/value is
    /// appended last.
    pub fn payload(
        &self,
        user_fields: &[(String, String)],
        user_files: &[(String, PathBuf)],
        submitter: Option<&Submitter>,
    ) -> FormPayload {
        let mut payload = FormPayload::default();

        for (name, value) in &self.fields {
            if user_fields.iter().any(|(n, _)| n == name) {
                continue;
            }
            payload.push_text(name.clone(), value.clone());
        }
        for (name, value) in user_fields {
            payload.push_text(name.clone(), value.clone());
        }

        for name in &self.file_inputs {
            let mut matched = user_files.iter().filter(|(n, _)| n == name).peekable();
            if matched.peek().is_none() {
                payload.parts.push((name.clone(), PartValue::EmptyFile));
            }
            for (_, path) in matched {
                payload.parts.push((name.clone(), PartValue::File(path.clone())));
            }
        }
        for (name, path) in user_files {
            if !self.file_inputs.contains(name) {
                payload.parts.push((name.clone(), PartValue::File(path.clone())));
            }
        }

        if let Some(submitter) = submitter.filter(|s| !s.name.is_empty()) {
            payload.push_text(submitter.name.clone(), submitter.value.clone());
        }

        payload
    }
}

fn submitter(control: ElementRef<'_>, name: &str) -> Submitter {
    let elem = control.value();
    let value = elem.attr("value").unwrap_or("").to_string();
    let text = control.text().collect::<String>().trim().to_string();
    Submitter {
        name: name.to_string(),
        label: if text.is_empty() { value.clone() } else { text },
        value,
    }
}

fn selected_option(select: ElementRef<'_>, option_selector: &Selector) -> String {
    let mut first = None;
    for option in select.select(option_selector) {
        let value = option
            .value()
            .attr("value")
            .map_or_else(|| option.text().collect::<String>().trim().to_string(), str::to_string);
        if option.value().attr("selected").is_some() {
            return value;
        }
        first.get_or_insert(value);
    }
    first.unwrap_or_default()
}

/// Parse `name=value` arguments from the CLI, keeping their order.
pub fn parse_field_args(field_args: &[String]) -> Result<Vec<(String, String)>> {
    field_args
        .iter()
        .map(|arg| match arg.split_once('=') {
            Some((name, value)) if !name.is_empty() => Ok((name.to_string(), value.to_string())),
            _ => anyhow::bail!("Invalid field format: '{}'. Expected 'name=value'", arg),
        })
        .collect()
}
