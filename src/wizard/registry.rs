use super::{WizardContext, WizardInstance};
use crate::core::{Result, WizardError};
use log::debug;
use std::fmt;
use std::sync::Arc;

/// Identifier of the wizard that creates missing tables and columns.
pub const INITIAL_SCHEMA: &str = "initial-schema";
/// Identifier of the wizard that applies the remaining schema changes.
pub const FINAL_SCHEMA: &str = "final-schema";

pub type WizardFactory = Arc<dyn Fn(WizardContext) -> WizardInstance + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bookend {
    InitialSchema,
    FinalSchema,
}

impl Bookend {
    pub fn of(identifier: &str) -> Option<Self> {
        match identifier {
            INITIAL_SCHEMA => Some(Bookend::InitialSchema),
            FINAL_SCHEMA => Some(Bookend::FinalSchema),
            _ => None,
        }
    }
}

#[derive(Clone)]
pub struct WizardDescriptor {
    identifier: String,
    factory: WizardFactory,
}

impl WizardDescriptor {
    pub fn new<F>(identifier: impl Into<String>, factory: F) -> Self
    where
        F: Fn(WizardContext) -> WizardInstance + Send + Sync + 'static,
    {
        Self {
            identifier: identifier.into(),
            factory: Arc::new(factory),
        }
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn bookend(&self) -> Option<Bookend> {
        Bookend::of(&self.identifier)
    }

    pub fn is_bookend(&self) -> bool {
        self.bookend().is_some()
    }

    pub fn instantiate(&self, context: WizardContext) -> WizardInstance {
        (self.factory)(context)
    }
}

impl fmt::Debug for WizardDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WizardDescriptor")
            .field("identifier", &self.identifier)
            .field("bookend", &self.bookend())
            .finish()
    }
}

/// Ordered set of wizard descriptors. Registration order is the order in
/// which wizards are offered.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    descriptors: Vec<WizardDescriptor>,
}

/// Registry as seen by one invocation, with the bookends placed.
#[derive(Debug)]
pub struct BookendPlacement {
    pub registry: Registry,
    pub needs_initial_schema: bool,
    /// Eligibility checks of bookends that failed; the bookend is left out.
    pub errors: Vec<WizardError>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a wizard. Identifiers must be unique.
    pub fn register(&mut self, descriptor: WizardDescriptor) -> Result<()> {
        if self.contains(descriptor.identifier()) {
            return Err(WizardError::DuplicateIdentifier(
                descriptor.identifier().to_string(),
            ));
        }
        debug!("Registered update wizard '{}'", descriptor.identifier());
        self.descriptors.push(descriptor);
        Ok(())
    }

    pub fn with_wizard<F>(mut self, identifier: impl Into<String>, factory: F) -> Result<Self>
    where
        F: Fn(WizardContext) -> WizardInstance + Send + Sync + 'static,
    {
        self.register(WizardDescriptor::new(identifier, factory))?;
        Ok(self)
    }

    pub fn get(&self, identifier: &str) -> Result<&WizardDescriptor> {
        self.descriptors
            .iter()
            .find(|d| d.identifier() == identifier)
            .ok_or_else(|| WizardError::UnknownWizard(identifier.to_string()))
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.position(identifier).is_some()
    }

    pub fn position(&self, identifier: &str) -> Option<usize> {
        self.descriptors.iter().position(|d| d.identifier() == identifier)
    }

    pub fn iter(&self) -> impl Iterator<Item = &WizardDescriptor> {
        self.descriptors.iter()
    }

    pub fn identifiers(&self) -> Vec<&str> {
        self.descriptors.iter().map(|d| d.identifier()).collect()
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Builds the registry for one invocation.
    ///
    /// An eligible initial-schema wizard moves to the front and an eligible
    /// final-schema wizard to the back; every other wizard keeps its
    /// registration order. Bookends that are not eligible, or whose check
    /// failed, are left out. `self` is not modified.
    pub fn with_bookends<F>(&self, mut is_eligible: F) -> BookendPlacement
    where
        F: FnMut(&WizardDescriptor) -> Result<bool>,
    {
        let mut errors = Vec::new();
        let mut check = |descriptor: Option<&WizardDescriptor>| -> Option<WizardDescriptor> {
            let descriptor = descriptor?;
            match is_eligible(descriptor) {
                Ok(true) => Some(descriptor.clone()),
                Ok(false) => None,
                Err(err) => {
                    errors.push(err);
                    None
                }
            }
        };

        let initial = check(self.get(INITIAL_SCHEMA).ok());
        let finalize = check(self.get(FINAL_SCHEMA).ok());
        let needs_initial_schema = initial.is_some();

        let mut descriptors = Vec::with_capacity(self.descriptors.len());
        descriptors.extend(initial);
        descriptors.extend(self.descriptors.iter().filter(|d| !d.is_bookend()).cloned());
        descriptors.extend(finalize);

        BookendPlacement {
            registry: Registry { descriptors },
            needs_initial_schema,
            errors,
        }
    }
}
