use super::view::{PendingOutcome, PendingReport, PendingWizardView, PromptView};
use crate::config::UpgradeConfig;
use crate::core::{FormValues, Result, StatusMessage, version_ordinal};
use crate::migration::SchemaBootstrap;
use crate::wizard::{
    Bookend, BookendPlacement, HostContext, Registry, WizardContext, WizardDescriptor,
    WizardInstance,
};
use log::{debug, info};

pub const DEFAULT_FIELD_PREFIX: &str = "install[values]";

/// Decides which wizard runs when.
///
/// Holds only configuration. Every answer is derived from the wizards'
/// eligibility checks at the time of the call, so separate invocations never
/// share state.
pub struct OrchestrationEngine {
    registry: Registry,
    host: HostContext,
    target_version: u32,
    field_prefix: String,
    bootstrap: Option<SchemaBootstrap>,
}

impl OrchestrationEngine {
    pub fn new(registry: Registry, host: HostContext, target_version: u32) -> Self {
        Self {
            registry,
            host,
            target_version,
            field_prefix: DEFAULT_FIELD_PREFIX.to_string(),
            bootstrap: None,
        }
    }

    pub fn from_config(config: &UpgradeConfig, registry: Registry, host: HostContext) -> Result<Self> {
        let target_version = version_ordinal(&config.target_version)?;
        Ok(Self::new(registry, host, target_version).with_field_prefix(&config.field_prefix))
    }

    pub fn with_bootstrap(mut self, bootstrap: SchemaBootstrap) -> Self {
        self.bootstrap = Some(bootstrap);
        self
    }

    pub fn with_field_prefix(mut self, prefix: &str) -> Self {
        self.field_prefix = prefix.to_string();
        self
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn target_version(&self) -> u32 {
        self.target_version
    }

    pub fn bootstrap(&self) -> Option<&SchemaBootstrap> {
        self.bootstrap.as_ref()
    }

    /// Builds a fresh wizard instance fed with its own slice of `values`.
    pub fn instantiate(&self, descriptor: &WizardDescriptor, values: &FormValues) -> WizardInstance {
        descriptor.instantiate(WizardContext {
            identifier: descriptor.identifier().to_string(),
            target_version: self.target_version,
            input: values.for_wizard(descriptor.identifier()),
            host: self.host.clone(),
        })
    }

    /// Looks up a configured wizard and instantiates it.
    pub fn wizard(&self, identifier: &str, values: &FormValues) -> Result<WizardInstance> {
        let descriptor = self.registry.get(identifier)?;
        Ok(self.instantiate(descriptor, values))
    }

    /// Places the bookends for this invocation. See [`Registry::with_bookends`].
    pub fn with_bookends(&self, values: &FormValues) -> BookendPlacement {
        let placement = self
            .registry
            .with_bookends(|descriptor| self.instantiate(descriptor, values).is_eligible());
        debug!(
            "Wizard order for this invocation: {:?}",
            placement.registry.identifiers()
        );
        placement
    }

    /// Lists the wizards that still need to run, in order.
    ///
    /// Iteration stops at an eligible initial-schema wizard: the wizards after
    /// it may rely on tables or columns that do not exist yet and are not
    /// queried. Only visited wizards are counted towards the progress.
    pub fn compute_pending(&self, registry: &Registry, values: &FormValues) -> Result<PendingOutcome> {
        let mut pending: Vec<PendingWizardView> = Vec::new();
        let mut done = Vec::new();
        let mut needs_initial_schema = false;

        for descriptor in registry.iter() {
            let wizard = self.instantiate(descriptor, values);
            if !wizard.is_eligible()? {
                done.push(descriptor.identifier().to_string());
                continue;
            }

            let mut view = PendingWizardView {
                identifier: descriptor.identifier().to_string(),
                title: wizard.title(),
                explanation: wizard.explanation(),
                render_next_button: false,
            };

            match descriptor.bookend() {
                Some(Bookend::InitialSchema) => {
                    needs_initial_schema = true;
                    view.render_next_button = needs_initial_schema;
                    pending.push(view);
                    break;
                }
                // Patched below once the whole list is known.
                Some(Bookend::FinalSchema) => pending.push(view),
                None => {
                    view.render_next_button = !needs_initial_schema && wizard.wants_next_button();
                    pending.push(view);
                }
            }
        }

        let sole_entry = pending.len() == 1;
        for view in pending.iter_mut() {
            if Bookend::of(&view.identifier) == Some(Bookend::FinalSchema) {
                view.render_next_button = sole_entry;
            }
        }

        let total = done.len() + pending.len();
        if total == 0 {
            return Ok(PendingOutcome::NoWizards(StatusMessage::warning(
                "No update wizards registered",
            )));
        }

        let percent_complete = ((total - pending.len()) * 100 / total) as u8;
        info!(
            "{} of {} update wizard(s) pending ({}% done)",
            pending.len(),
            total,
            percent_complete
        );

        Ok(PendingOutcome::Listed(PendingReport {
            pending,
            done,
            total,
            percent_complete,
            needs_initial_schema,
        }))
    }

    /// Returns the input form of a wizard. Has no side effect beyond
    /// instantiating it.
    pub fn prompt(&self, identifier: &str, values: &FormValues) -> Result<PromptView> {
        let wizard = self.wizard(identifier, values)?;
        let prefix = format!("{}[{}]", self.field_prefix, identifier);

        Ok(PromptView {
            identifier: identifier.to_string(),
            title: wizard.title(),
            form: wizard.render_input_form(&prefix).unwrap_or_default(),
        })
    }

    /// Finds the wizard to offer after `current` has run.
    ///
    /// An ordinary wizard is never offered again on the same pass. A bookend
    /// is checked again in place, since running it (or the wizard before it)
    /// changes the schema it inspects.
    pub fn resolve_next(
        &self,
        registry: &Registry,
        current: &str,
        values: &FormValues,
    ) -> Result<Option<String>> {
        let mut seen_current = false;

        for descriptor in registry.iter() {
            if descriptor.identifier() == current {
                seen_current = true;
                if !descriptor.is_bookend() {
                    continue;
                }
            }

            if seen_current && self.instantiate(descriptor, values).is_eligible()? {
                return Ok(Some(descriptor.identifier().to_string()));
            }
        }

        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Result, UserInput};
    use crate::store::MemoryCompletionStore;
    use crate::storage::MemorySchema;
    use crate::wizard::{FINAL_SCHEMA, INITIAL_SCHEMA, UpdateOutcome, Upgrade, Wizard};
    use std::collections::HashMap;
    use std::sync::Arc;

    struct Flagged {
        identifier: String,
        eligible: bool,
        next_button: bool,
    }

    impl Wizard for Flagged {
        fn identifier(&self) -> &str {
            &self.identifier
        }
        fn title(&self) -> String {
            format!("Wizard {}", self.identifier)
        }
        fn is_eligible(&self) -> Result<bool> {
            Ok(self.eligible)
        }
        fn wants_next_button(&self) -> bool {
            self.next_button
        }
    }

    impl Upgrade for Flagged {
        fn execute(&mut self, _input: &UserInput) -> UpdateOutcome {
            UpdateOutcome::succeeded(Vec::new())
        }
    }

    fn engine(wizards: &[(&str, bool)]) -> OrchestrationEngine {
        let eligibility: Arc<HashMap<String, bool>> = Arc::new(
            wizards.iter().map(|(id, e)| (id.to_string(), *e)).collect(),
        );
        let mut registry = Registry::new();
        for (id, _) in wizards {
            let eligibility = Arc::clone(&eligibility);
            registry
                .register(WizardDescriptor::new(*id, move |ctx| {
                    WizardInstance::simple(Flagged {
                        eligible: eligibility[&ctx.identifier],
                        next_button: ctx.identifier != "info",
                        identifier: ctx.identifier,
                    })
                }))
                .unwrap();
        }
        let host = HostContext::new(
            Arc::new(MemorySchema::new()),
            Arc::new(MemoryCompletionStore::new()),
        );
        OrchestrationEngine::new(registry, host, 12_004_000)
    }

    fn listed(outcome: PendingOutcome) -> PendingReport {
        match outcome {
            PendingOutcome::Listed(report) => report,
            PendingOutcome::NoWizards(msg) => panic!("unexpected warning: {}", msg.title),
        }
    }

    #[test]
    fn test_percentage_counts_done_wizards() {
        let engine = engine(&[("a", false), ("b", true), ("c", false), ("d", false)]);
        let report = listed(
            engine
                .compute_pending(engine.registry(), &FormValues::new())
                .unwrap(),
        );
        assert_eq!(report.total, 4);
        assert_eq!(report.pending.len(), 1);
        assert_eq!(report.percent_complete, 75);
        assert_eq!(report.done, vec!["a", "c", "d"]);
    }

    #[test]
    fn test_percentage_rounds_down() {
        let engine = engine(&[("a", false), ("b", true), ("c", true)]);
        let report = listed(
            engine
                .compute_pending(engine.registry(), &FormValues::new())
                .unwrap(),
        );
        assert_eq!(report.percent_complete, 33);
    }

    #[test]
    fn test_informational_wizard_opts_out_of_next_button() {
        let engine = engine(&[("info", true), ("b", true)]);
        let report = listed(
            engine
                .compute_pending(engine.registry(), &FormValues::new())
                .unwrap(),
        );
        assert!(!report.pending[0].render_next_button);
        assert!(report.pending[1].render_next_button);
    }

    #[test]
    fn test_empty_registry_warns() {
        let engine = engine(&[]);
        let outcome = engine
            .compute_pending(engine.registry(), &FormValues::new())
            .unwrap();
        let PendingOutcome::NoWizards(message) = outcome else {
            panic!("expected a warning");
        };
        assert_eq!(message.title, "No update wizards registered");
    }

    #[test]
    fn test_resolve_next_skips_ineligible() {
        let engine = engine(&[("a", true), ("b", false), ("c", true)]);
        let next = engine
            .resolve_next(engine.registry(), "a", &FormValues::new())
            .unwrap();
        assert_eq!(next.as_deref(), Some("c"));

        let last = engine
            .resolve_next(engine.registry(), "c", &FormValues::new())
            .unwrap();
        assert_eq!(last, None);
    }

    #[test]
    fn test_resolve_next_rechecks_bookend_in_place() {
        let engine = engine(&[(INITIAL_SCHEMA, true), ("a", true), (FINAL_SCHEMA, true)]);
        let placement = engine.with_bookends(&FormValues::new());

        let next = engine
            .resolve_next(&placement.registry, INITIAL_SCHEMA, &FormValues::new())
            .unwrap();
        assert_eq!(next.as_deref(), Some(INITIAL_SCHEMA));

        let next = engine
            .resolve_next(&placement.registry, FINAL_SCHEMA, &FormValues::new())
            .unwrap();
        assert_eq!(next.as_deref(), Some(FINAL_SCHEMA));
    }

    #[test]
    fn test_prompt_without_form_is_empty() {
        let engine = engine(&[("a", true)]);
        let view = engine.prompt("a", &FormValues::new()).unwrap();
        assert_eq!(view.title, "Wizard a");
        assert!(view.form.is_empty());
        assert!(engine.prompt("zzz", &FormValues::new()).is_err());
    }
}
