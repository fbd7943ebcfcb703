use serde::{Deserialize, Deserializer, Serialize};

/// One suite entry of a Ginkgo `--json-report` file.
///
/// Ginkgo writes many more fields than these; unknown fields are ignored.
/// `succeeded` is taken as reported and never recomputed from the specs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suite {
    #[serde(rename = "SuitePath")]
    pub path: String,
    #[serde(rename = "SuiteDescription")]
    pub description: String,
    #[serde(rename = "SuiteSucceeded")]
    pub succeeded: bool,
    #[serde(rename = "PreRunStats", default)]
    pub pre_run_stats: PreRunStats,
    #[serde(rename = "SpecReports", default, deserialize_with = "null_as_default")]
    pub spec_reports: Vec<Spec>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreRunStats {
    #[serde(rename = "TotalSpecs", default)]
    pub total_specs: u64,
    #[serde(rename = "SpecsThatWillRun", default)]
    pub specs_that_will_run: u64,
}

/// A single leaf node result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spec {
    #[serde(rename = "LeafNodeText", default)]
    pub name: String,
    #[serde(rename = "LeafNodeType", default)]
    pub node_type: String,
    #[serde(rename = "State")]
    pub state: String,
    #[serde(rename = "NumAttempts", default)]
    pub attempts: u32,
    #[serde(rename = "Failure", default, deserialize_with = "null_as_default")]
    failure: Failure,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Failure {
    #[serde(rename = "Message", default)]
    pub message: String,
    #[serde(rename = "Location", default, deserialize_with = "null_as_default")]
    pub location: Location,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    #[serde(rename = "LineNumber", default)]
    pub line_number: u32,
    #[serde(rename = "FullStackTrace", default)]
    pub stack_trace: String,
}

/// Go encodes nil slices as `null`.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl Spec {
    #[cfg(test)]
    pub fn new(name: &str, node_type: &str, state: &str, attempts: u32) -> Self {
        Self {
            name: name.to_string(),
            node_type: node_type.to_string(),
            state: state.to_string(),
            attempts,
            failure: Failure::default(),
        }
    }

    #[cfg(test)]
    #[must_use]
    pub fn with_failure(mut self, failure: Failure) -> Self {
        self.failure = failure;
        self
    }

    /// The failure record, or `None` when Ginkgo wrote a zero-valued one.
    pub fn failure(&self) -> Option<&Failure> {
        (self.failure != Failure::default()).then_some(&self.failure)
    }

    /// Passed, but only after one or more retries.
    pub fn is_flaky(&self) -> bool {
        self.state == "passed" && self.attempts > 1
    }
}

/// Per-suite spec counts keyed on Ginkgo's state names.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SuiteTally {
    pub passed: usize,
    pub failed: usize,
    pub flaky: usize,
    pub skipped: usize,
    pub pending: usize,
    pub other: usize,
}

impl SuiteTally {
    pub fn total(&self) -> usize {
        self.passed + self.failed + self.skipped + self.pending + self.other
    }

    fn record(&mut self, spec: &Spec) {
        match spec.state.as_str() {
            "passed" => {
                self.passed += 1;
                if spec.is_flaky() {
                    self.flaky += 1;
                }
            }
            "failed" | "panicked" | "interrupted" | "aborted" | "timedout" => self.failed += 1,
            "skipped" => self.skipped += 1,
            "pending" => self.pending += 1,
            _ => self.other += 1,
        }
    }

    fn merge(mut self, other: Self) -> Self {
        self.passed += other.passed;
        self.failed += other.failed;
        self.flaky += other.flaky;
        self.skipped += other.skipped;
        self.pending += other.pending;
        self.other += other.other;
        self
    }

    /// Combined counts over many suites.
    pub fn sum<'a>(suites: impl IntoIterator<Item = &'a Suite>) -> Self {
        suites
            .into_iter()
            .map(Suite::tally)
            .fold(Self::default(), Self::merge)
    }
}

impl Suite {
    pub fn tally(&self) -> SuiteTally {
        let mut tally = SuiteTally::default();
        for spec in &self.spec_reports {
            tally.record(spec);
        }
        tally
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GINKGO_REPORT: &str = r#"[
      {
        "SuitePath": "/work/repos/acme_widgets/test/e2e",
        "SuiteDescription": "Widgets E2E Suite",
        "SuiteSucceeded": false,
        "SuiteHasProgrammaticFocus": false,
        "PreRunStats": {"TotalSpecs": 3, "SpecsThatWillRun": 2},
        "SpecReports": [
          {
            "LeafNodeText": "creates a widget",
            "LeafNodeType": "It",
            "State": "passed",
            "NumAttempts": 2,
            "Failure": {"Message": "", "Location": {"FileName": "", "LineNumber": 0, "FullStackTrace": ""}}
          },
          {
            "LeafNodeText": "deletes a widget",
            "LeafNodeType": "It",
            "State": "failed",
            "NumAttempts": 3,
            "Failure": {
              "Message": "Expected <int>: 1 to equal <int>: 2",
              "Location": {"FileName": "widgets_test.go", "LineNumber": 42, "FullStackTrace": "widgets_test.go:42\nsuite.go:10"}
            }
          },
          {
            "LeafNodeText": "",
            "LeafNodeType": "BeforeSuite",
            "State": "passed",
            "NumAttempts": 1
          }
        ]
      }
    ]"#;

    #[test]
    fn test_decode_ginkgo_report() {
        let suites: Vec<Suite> = serde_json::from_str(GINKGO_REPORT).unwrap();
        assert_eq!(suites.len(), 1);

        let suite = &suites[0];
        assert_eq!(suite.description, "Widgets E2E Suite");
        assert!(!suite.succeeded);
        assert_eq!(suite.pre_run_stats.total_specs, 3);
        assert_eq!(suite.pre_run_stats.specs_that_will_run, 2);
        assert_eq!(suite.spec_reports.len(), 3);

        let failed = &suite.spec_reports[1];
        let failure = failed.failure().expect("failed spec carries a failure");
        assert_eq!(failure.message, "Expected <int>: 1 to equal <int>: 2");
        assert_eq!(failure.location.line_number, 42);
        assert!(failure.location.stack_trace.contains("suite.go:10"));
    }

    #[test]
    fn test_zero_valued_failure_is_absent() {
        let suites: Vec<Suite> = serde_json::from_str(GINKGO_REPORT).unwrap();
        assert!(suites[0].spec_reports[0].failure().is_none());
        assert!(suites[0].spec_reports[2].failure().is_none());
    }

    #[test]
    fn test_null_spec_reports() {
        let suites: Vec<Suite> = serde_json::from_str(
            r#"[{"SuitePath": "p", "SuiteDescription": "d", "SuiteSucceeded": true, "SpecReports": null}]"#,
        )
        .unwrap();
        assert!(suites[0].spec_reports.is_empty());
        assert_eq!(suites[0].pre_run_stats, PreRunStats::default());
    }

    #[test]
    fn test_null_failure_decodes_as_absent() {
        let suites: Vec<Suite> = serde_json::from_str(
            r#"[{"SuitePath": "p", "SuiteDescription": "d", "SuiteSucceeded": true, "SpecReports": [
                {"LeafNodeText": "a", "State": "passed", "Failure": null},
                {"LeafNodeText": "b", "State": "failed", "Failure": {"Message": "boom", "Location": null}}
            ]}]"#,
        )
        .unwrap();

        let specs = &suites[0].spec_reports;
        assert!(specs[0].failure().is_none());
        let failure = specs[1].failure().expect("message survives a null location");
        assert_eq!(failure.message, "boom");
        assert_eq!(failure.location, Location::default());
    }

    #[test]
    fn test_missing_required_field_is_rejected() {
        let result: Result<Vec<Suite>, _> =
            serde_json::from_str(r#"[{"SuitePath": "p", "SuiteDescription": "d"}]"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_tally_counts_flaky_as_passed() {
        let suites: Vec<Suite> = serde_json::from_str(GINKGO_REPORT).unwrap();
        let tally = suites[0].tally();

        assert_eq!(tally.passed, 2);
        assert_eq!(tally.flaky, 1);
        assert_eq!(tally.failed, 1);
        assert_eq!(tally.total(), 3);
    }

    #[test]
    fn test_tally_sum_across_suites() {
        let suite = |specs: Vec<Spec>| Suite {
            path: String::new(),
            description: String::new(),
            succeeded: true,
            pre_run_stats: PreRunStats::default(),
            spec_reports: specs,
        };
        let suites = vec![
            suite(vec![Spec::new("a", "It", "passed", 1)]),
            suite(vec![
                Spec::new("b", "It", "skipped", 0),
                Spec::new("c", "It", "pending", 0),
                Spec::new("d", "It", "mystery", 1),
            ]),
        ];

        let total = SuiteTally::sum(&suites);
        assert_eq!(total.passed, 1);
        assert_eq!(total.skipped, 1);
        assert_eq!(total.pending, 1);
        assert_eq!(total.other, 1);
        assert_eq!(total.total(), 4);
    }
}
