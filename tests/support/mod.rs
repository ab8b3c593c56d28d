#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use upgrade_wizard::{
    Capability, HostContext, InputCheck, InteractiveUpgrade, MemoryCompletionStore, MemorySchema,
    OrchestrationEngine, Registry, UpdateOutcome, Upgrade, UserInput, ValidatedUpgrade, Wizard,
    WizardDescriptor, WizardInstance,
};

/// Scripted wizard whose eligibility can be flipped from the test and whose
/// calls are counted.
#[derive(Clone)]
pub struct Spy {
    eligible: Arc<AtomicBool>,
    checks: Arc<AtomicUsize>,
    executions: Arc<AtomicUsize>,
    last_input: Arc<std::sync::Mutex<Option<UserInput>>>,
    kind: Capability,
    succeed: bool,
    finish_on_success: bool,
    next_button: bool,
    rejection: Option<String>,
    statements: Vec<String>,
    message: String,
}

impl Spy {
    pub fn new(eligible: bool) -> Self {
        Self {
            eligible: Arc::new(AtomicBool::new(eligible)),
            checks: Arc::new(AtomicUsize::new(0)),
            executions: Arc::new(AtomicUsize::new(0)),
            last_input: Arc::new(std::sync::Mutex::new(None)),
            kind: Capability::Simple,
            succeed: true,
            finish_on_success: true,
            next_button: true,
            rejection: None,
            statements: Vec::new(),
            message: String::new(),
        }
    }

    pub fn eligible() -> Self {
        Self::new(true)
    }

    pub fn done() -> Self {
        Self::new(false)
    }

    pub fn kind(mut self, kind: Capability) -> Self {
        self.kind = kind;
        self
    }

    pub fn failing(mut self, message: &str) -> Self {
        self.succeed = false;
        self.message = message.to_string();
        self
    }

    /// Stays eligible after a successful run.
    pub fn sticky(mut self) -> Self {
        self.finish_on_success = false;
        self
    }

    pub fn without_next_button(mut self) -> Self {
        self.next_button = false;
        self
    }

    /// Validator rejects every input with `message`. Implies `Validated`.
    pub fn rejecting(mut self, message: &str) -> Self {
        self.kind = Capability::Validated;
        self.rejection = Some(message.to_string());
        self
    }

    pub fn statements(mut self, statements: &[&str]) -> Self {
        self.statements = statements.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn set_eligible(&self, eligible: bool) {
        self.eligible.store(eligible, Ordering::SeqCst);
    }

    pub fn checks(&self) -> usize {
        self.checks.load(Ordering::SeqCst)
    }

    pub fn executions(&self) -> usize {
        self.executions.load(Ordering::SeqCst)
    }

    pub fn last_input(&self) -> Option<UserInput> {
        self.last_input.lock().unwrap().clone()
    }

    pub fn descriptor(&self, identifier: &str) -> WizardDescriptor {
        let spy = self.clone();
        WizardDescriptor::new(identifier, move |ctx| {
            let wizard = SpyWizard {
                identifier: ctx.identifier,
                spy: spy.clone(),
            };
            match spy.kind {
                Capability::Notice => WizardInstance::notice(wizard),
                Capability::Simple => WizardInstance::simple(wizard),
                Capability::Interactive => WizardInstance::interactive(wizard),
                Capability::Validated => WizardInstance::validated(wizard),
            }
        })
    }
}

struct SpyWizard {
    identifier: String,
    spy: Spy,
}

impl Wizard for SpyWizard {
    fn identifier(&self) -> &str {
        &self.identifier
    }

    fn title(&self) -> String {
        format!("Spy {}", self.identifier)
    }

    fn is_eligible(&self) -> upgrade_wizard::Result<bool> {
        self.spy.checks.fetch_add(1, Ordering::SeqCst);
        Ok(self.spy.eligible.load(Ordering::SeqCst))
    }

    fn explanation(&self) -> String {
        format!("Explains {}", self.identifier)
    }

    fn wants_next_button(&self) -> bool {
        self.spy.next_button
    }
}

impl Upgrade for SpyWizard {
    fn execute(&mut self, input: &UserInput) -> UpdateOutcome {
        self.spy.executions.fetch_add(1, Ordering::SeqCst);
        *self.spy.last_input.lock().unwrap() = Some(input.clone());

        if !self.spy.succeed {
            return UpdateOutcome::failed(self.spy.statements.clone(), self.spy.message.clone());
        }
        if self.spy.finish_on_success {
            self.spy.set_eligible(false);
        }
        UpdateOutcome::succeeded(self.spy.statements.clone())
    }
}

impl InteractiveUpgrade for SpyWizard {
    fn render_input_form(&self, field_prefix: &str) -> String {
        format!("<input name=\"{}[answer]\">", field_prefix)
    }
}

impl ValidatedUpgrade for SpyWizard {
    fn validate_input(&self, _input: &UserInput) -> InputCheck {
        match &self.spy.rejection {
            Some(message) => InputCheck::Invalid(message.clone()),
            None => InputCheck::Valid,
        }
    }
}

pub fn registry(wizards: &[(&str, &Spy)]) -> Registry {
    let mut registry = Registry::new();
    for (identifier, spy) in wizards {
        registry.register(spy.descriptor(identifier)).unwrap();
    }
    registry
}

pub fn host() -> HostContext {
    HostContext::new(
        Arc::new(MemorySchema::new()),
        Arc::new(MemoryCompletionStore::new()),
    )
}

pub fn engine(registry: Registry) -> OrchestrationEngine {
    OrchestrationEngine::new(registry, host(), 12_004_000)
}
