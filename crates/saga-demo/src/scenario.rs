use std::path::Path;

use serde::Deserialize;

use crate::error::{CliError, Result};
use crate::service::Service;

/// Which direction of a participant is made to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum FailurePoint {
    Execute,
    Compensate,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct ParticipantSpec {
    pub(crate) name: String,
    #[serde(default)]
    pub(crate) fail: Option<FailurePoint>,
}

/// Ordered list of demo participants, usually read from a TOML file:
///
/// ```toml
/// [[participant]]
/// name = "Service-1"
///
/// [[participant]]
/// name = "Service-2"
/// fail = "execute"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct Scenario {
    #[serde(default, rename = "participant")]
    participants: Vec<ParticipantSpec>,
}

impl Default for Scenario {
    fn default() -> Self {
        let healthy = ["Service-1", "Service-2", "Service-3"]
            .into_iter()
            .map(|name| ParticipantSpec {
                name: name.to_string(),
                fail: None,
            });
        let failing = ParticipantSpec {
            name: "Service-4-Failed".to_string(),
            fail: Some(FailurePoint::Execute),
        };

        Self {
            participants: healthy.chain(std::iter::once(failing)).collect(),
        }
    }
}

impl Scenario {
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| CliError::ScenarioRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content, path)
    }

    pub(crate) fn parse(content: &str, path: &Path) -> Result<Self> {
        toml::from_str(content).map_err(|source| CliError::ScenarioParse {
            path: path.to_path_buf(),
            source,
        })
    }

    #[cfg(test)]
    pub(crate) fn participants(&self) -> &[ParticipantSpec] {
        &self.participants
    }

    /// Make every participant called `name` fail its transaction.
    pub(crate) fn fail_at(&mut self, name: &str) -> Result<()> {
        self.set_failure(name, FailurePoint::Execute)
    }

    /// Make every participant called `name` fail its compensation.
    pub(crate) fn fail_compensation(&mut self, name: &str) -> Result<()> {
        self.set_failure(name, FailurePoint::Compensate)
    }

    fn set_failure(&mut self, name: &str, point: FailurePoint) -> Result<()> {
        let mut found = false;
        for spec in self.participants.iter_mut().filter(|p| p.name == name) {
            spec.fail = Some(point);
            found = true;
        }

        if found {
            Ok(())
        } else {
            Err(CliError::UnknownParticipant(name.to_string()))
        }
    }

    pub(crate) fn services(&self) -> Vec<Service> {
        self.participants
            .iter()
            .map(|spec| Service::new(spec.name.clone(), spec.fail))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn path() -> PathBuf {
        PathBuf::from("scenario.toml")
    }

    #[test]
    fn default_scenario_ends_with_failing_service() {
        let scenario = Scenario::default();

        let names: Vec<_> = scenario.participants().iter().map(|p| &p.name).collect();
        assert_eq!(
            names,
            ["Service-1", "Service-2", "Service-3", "Service-4-Failed"]
        );
        assert_eq!(
            scenario.participants()[3].fail,
            Some(FailurePoint::Execute)
        );
        assert!(scenario.participants()[..3].iter().all(|p| p.fail.is_none()));
    }

    #[test]
    fn parses_participants_in_order() -> anyhow::Result<()> {
        let scenario = Scenario::parse(
            r#"
[[participant]]
name = "inventory"

[[participant]]
name = "payment"
fail = "compensate"

[[participant]]
name = "shipping"
fail = "execute"
"#,
            &path(),
        )?;

        assert_eq!(
            scenario.participants(),
            [
                ParticipantSpec {
                    name: "inventory".to_string(),
                    fail: None,
                },
                ParticipantSpec {
                    name: "payment".to_string(),
                    fail: Some(FailurePoint::Compensate),
                },
                ParticipantSpec {
                    name: "shipping".to_string(),
                    fail: Some(FailurePoint::Execute),
                },
            ]
        );
        Ok(())
    }

    #[test]
    fn empty_document_is_an_empty_scenario() -> anyhow::Result<()> {
        let scenario = Scenario::parse("", &path())?;

        assert!(scenario.participants().is_empty());
        assert!(scenario.services().is_empty());
        Ok(())
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let result = Scenario::parse(
            r#"
[[participant]]
name = "inventory"
retries = 3
"#,
            &path(),
        );

        assert!(matches!(result, Err(CliError::ScenarioParse { .. })));
    }

    #[test]
    fn unknown_failure_point_is_rejected() {
        let result = Scenario::parse(
            r#"
[[participant]]
name = "inventory"
fail = "sometimes"
"#,
            &path(),
        );

        assert!(matches!(result, Err(CliError::ScenarioParse { .. })));
    }

    #[test]
    fn missing_file_reports_read_error() {
        let result = Scenario::load(Path::new("/nonexistent/scenario.toml"));

        assert!(matches!(result, Err(CliError::ScenarioRead { .. })));
    }

    #[test]
    fn overrides_mark_named_participants() -> anyhow::Result<()> {
        let mut scenario = Scenario::default();

        scenario.fail_at("Service-2")?;
        scenario.fail_compensation("Service-1")?;

        assert_eq!(
            scenario.participants()[0].fail,
            Some(FailurePoint::Compensate)
        );
        assert_eq!(
            scenario.participants()[1].fail,
            Some(FailurePoint::Execute)
        );
        Ok(())
    }

    #[test]
    fn override_of_unknown_participant_fails() {
        let mut scenario = Scenario::default();

        let result = scenario.fail_at("Billing");

        assert!(matches!(result, Err(CliError::UnknownParticipant(name)) if name == "Billing"));
    }
}
