//! Probe definitions for the read endpoints of Rekor and Fulcio.

use reqwest::Method;
use std::collections::BTreeMap;
use std::fmt;

/// One of the two probed services.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    Rekor,
    Fulcio,
}

impl Target {
    pub fn name(&self) -> &'static str {
        match self {
            Target::Rekor => "rekor",
            Target::Fulcio => "fulcio",
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single read probe: one HTTP request issued purely for measurement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeDefinition {
    pub endpoint_path: String,
    pub method: Method,
    pub query_params: BTreeMap<String, String>,
    pub body: Vec<u8>,
}

impl ProbeDefinition {
    pub fn new(method: Method, endpoint_path: impl Into<String>) -> Self {
        Self {
            endpoint_path: endpoint_path.into(),
            method,
            query_params: BTreeMap::new(),
            body: Vec::new(),
        }
    }

    pub fn get(endpoint_path: impl Into<String>) -> Self {
        Self::new(Method::GET, endpoint_path)
    }

    pub fn post(endpoint_path: impl Into<String>, body: impl Into<Vec<u8>>) -> Self {
        Self::new(Method::POST, endpoint_path).with_body(body)
    }

    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query_params.insert(key.into(), value.into());
        self
    }

    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }
}

/// The fixed, ordered probe lists for both targets.
///
/// Order is execution order within a pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeCatalog {
    rekor: Vec<ProbeDefinition>,
    fulcio: Vec<ProbeDefinition>,
}

impl ProbeCatalog {
    pub fn new(rekor: Vec<ProbeDefinition>, fulcio: Vec<ProbeDefinition>) -> Self {
        Self { rekor, fulcio }
    }

    /// The public Rekor and Fulcio read APIs.
    pub fn builtin() -> Self {
        Self::new(rekor_endpoints(), fulcio_endpoints())
    }

    pub fn probes(&self, target: Target) -> &[ProbeDefinition] {
        match target {
            Target::Rekor => &self.rekor,
            Target::Fulcio => &self.fulcio,
        }
    }

    /// Number of read probes executed per pass.
    pub fn len(&self) -> usize {
        self.rekor.len() + self.fulcio.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for ProbeCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

fn rekor_endpoints() -> Vec<ProbeDefinition> {
    vec![
        ProbeDefinition::get("/api/v1/log"),
        ProbeDefinition::get("/api/v1/log/publicKey"),
        ProbeDefinition::get("/api/v1/log/entries").with_query("logIndex", "10"),
        ProbeDefinition::get("/api/v1/log/proof")
            .with_query("firstSize", "10")
            .with_query("lastSize", "20"),
        ProbeDefinition::post("/api/v1/log/entries/retrieve", r#"{"logIndexes":[10]}"#),
        ProbeDefinition::post(
            "/api/v1/index/retrieve",
            r#"{"hash":"sha256:2bd37672a9e472c79c64f42b95e362db16870e28a90f3b17fee8faf952e79b4b"}"#,
        ),
    ]
}

fn fulcio_endpoints() -> Vec<ProbeDefinition> {
    vec![
        ProbeDefinition::get("/api/v1/rootCert"),
        ProbeDefinition::get("/api/v2/trustBundle"),
        ProbeDefinition::get("/api/v2/configuration"),
    ]
}
