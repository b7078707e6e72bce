use serde::Serialize;

use crate::graph::Notice;

use super::payload::RenderPayload;

/// Output document for one period: the dataset's load notices, then the payload fields.
#[derive(Debug, Serialize)]
pub struct PeriodReport<'a> {
    pub notices: &'a [Notice],
    #[serde(flatten)]
    pub payload: &'a RenderPayload,
}

/// Output document for every period; notices appear once, not per period.
#[derive(Debug, Serialize)]
pub struct BatchReport<'a> {
    pub notices: &'a [Notice],
    pub periods: &'a [RenderPayload],
}

impl PeriodReport<'_> {
    pub fn to_json(&self, pretty: bool) -> serde_json::Result<String> {
        to_json(self, pretty)
    }
}

impl BatchReport<'_> {
    pub fn to_json(&self, pretty: bool) -> serde_json::Result<String> {
        to_json(self, pretty)
    }
}

fn to_json(value: &impl Serialize, pretty: bool) -> serde_json::Result<String> {
    if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
}
