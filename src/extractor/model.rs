use serde::Deserialize;

/// Stand-in for any field the extraction call could not produce. Downstream
/// formatting relies on every field being a renderable string, so absent
/// values are represented by this literal, never by `None` or `""`.
pub const NOT_SPECIFIED: &str = "Not specified";

/// Sentinel returned when no application link can be extracted.
pub const NO_LINK_FOUND: &str = "No link found";

fn not_specified() -> String {
    NOT_SPECIFIED.to_string()
}

/// Structured fields extracted from a video transcript. Keys absent from the
/// model's JSON are filled with the sentinel at deserialization time.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct JobDetails {
    #[serde(default = "not_specified")]
    pub company_name: String,
    #[serde(default = "not_specified")]
    pub role: String,
    #[serde(default = "not_specified")]
    pub location: String,
    #[serde(rename = "job_requirements", default = "not_specified")]
    pub requirements: String,
    #[serde(default = "not_specified")]
    pub package_range: String,
}

impl JobDetails {
    /// The all-sentinel record used whenever the extraction output cannot be
    /// trusted.
    pub fn unspecified() -> Self {
        Self {
            company_name: not_specified(),
            role: not_specified(),
            location: not_specified(),
            requirements: not_specified(),
            package_range: not_specified(),
        }
    }

    /// Collapse blank values to the sentinel so no field is ever empty.
    pub fn normalized(mut self) -> Self {
        for field in [
            &mut self.company_name,
            &mut self.role,
            &mut self.location,
            &mut self.requirements,
            &mut self.package_range,
        ] {
            if field.trim().is_empty() {
                *field = not_specified();
            }
        }
        self
    }
}

/// What became of one extraction call. `Malformed` is a first-class variant,
/// not an error: it always maps to the all-sentinel record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractionOutcome {
    Parsed(JobDetails),
    Malformed,
}

impl ExtractionOutcome {
    pub fn into_details(self) -> JobDetails {
        match self {
            ExtractionOutcome::Parsed(details) => details,
            ExtractionOutcome::Malformed => JobDetails::unspecified(),
        }
    }
}
