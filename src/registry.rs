//! Component registry: build, cache, and filter fault-injection targets
//!
//! The registry turns a stack's component topology into concrete
//! [`ComponentDescriptor`]s. The descriptor set is built lazily, exactly
//! once, by querying the pattern catalog once per pattern key; the
//! environment-driven exclusions are applied fresh on every call because
//! the environment can change between calls in a long-lived run.

use crate::component::{ComponentDescriptor, InvalidDescriptorError};
use crate::environment::EnvironmentContext;
use crate::patterns::{PatternCatalog, PatternKey, PatternRule};
use crate::stacks::StackSpec;

/// Two-phase registry lifecycle. "Already built" is an explicit state, not
/// an emptiness check on the descriptor container.
#[derive(Debug, Clone)]
enum BuildState {
    Unbuilt,
    Built(Vec<ComponentDescriptor>),
}

/// Registry of the monitorable components of one stack instance
///
/// One registry per stack under test; it owns its descriptors and the
/// catalog adapter, and lives as long as the harness session. `build` needs
/// external mutual exclusion if the registry is shared across threads;
/// filtering is read-only over the built set.
///
/// # Example
/// ```
/// use derribar::environment::RunEnvironment;
/// use derribar::patterns::TemplateCatalog;
/// use derribar::registry::ComponentRegistry;
/// use derribar::stacks::StackSpec;
///
/// let stack = StackSpec::new("demo", ["svc-a", "svc-b"], "svc-sched");
/// let mut registry = ComponentRegistry::new(stack, TemplateCatalog::new());
///
/// let env = RunEnvironment::new();
/// let names: Vec<&str> = registry
///     .components(&env)
///     .unwrap()
///     .iter()
///     .map(|c| c.name())
///     .collect();
/// assert_eq!(names, ["svc-a", "svc-b", "svc-sched"]);
/// ```
#[derive(Debug)]
pub struct ComponentRegistry<C> {
    stack: StackSpec,
    catalog: C,
    state: BuildState,
}

impl<C: PatternCatalog> ComponentRegistry<C> {
    pub fn new(stack: StackSpec, catalog: C) -> Self {
        Self {
            stack,
            catalog,
            state: BuildState::Unbuilt,
        }
    }

    /// The stack this registry serves
    pub fn stack(&self) -> &StackSpec {
        &self.stack
    }

    /// Whether the one-time build has completed
    pub fn is_built(&self) -> bool {
        matches!(self.state, BuildState::Built(_))
    }

    /// Build the full descriptor set if it has not been built yet.
    ///
    /// Idempotent: a no-op in the built state. The set is assembled into a
    /// local buffer and only committed on success, so a construction error
    /// leaves the registry unbuilt and a later call retries the full build.
    pub fn build(&mut self) -> Result<(), InvalidDescriptorError> {
        if let BuildState::Unbuilt = self.state {
            let built = self.assemble()?;
            self.state = BuildState::Built(built);
        }
        Ok(())
    }

    /// The current component list: fault-injection targets and their log
    /// signatures, filtered for the given environment.
    ///
    /// Builds on first use. Exclusions are never cached; each call reflects
    /// the environment it was handed. The returned order is the registration
    /// order from the build phase.
    pub fn components(
        &mut self,
        env: &dyn EnvironmentContext,
    ) -> Result<Vec<&ComponentDescriptor>, InvalidDescriptorError> {
        self.build()?;
        let built = match &self.state {
            BuildState::Built(list) => list,
            BuildState::Unbuilt => unreachable!("build() established the built state"),
        };

        let mut components = Vec::with_capacity(built.len());
        for desc in built {
            // Profiled processes can't be shot with the harness's kill
            // primitive, so they are never offered as targets.
            if env.profiling_active() && env.is_profiled(desc.name()) {
                tracing::info!(
                    "Filtering {} from the component list as it is being profiled this run",
                    desc.name()
                );
                continue;
            }

            if self.stack.is_fence(desc.name()) && !env.fencing_enabled() {
                tracing::info!(
                    "Filtering {} from the component list as fencing is disabled this run",
                    desc.name()
                );
                continue;
            }

            components.push(desc);
        }

        Ok(components)
    }

    /// Construct the full descriptor set: standard components, then the
    /// scheduler, then stack-specific extras. Later registrations replace
    /// an earlier entry of the same name in place.
    fn assemble(&self) -> Result<Vec<ComponentDescriptor>, InvalidDescriptorError> {
        let stack = self.stack.name();
        let common = self.catalog.get_component(stack, PatternKey::IgnoreCommon);

        let mut built: Vec<ComponentDescriptor> = Vec::new();

        for name in self.stack.standard() {
            let desc = ComponentDescriptor::from_parts(
                name.clone(),
                Some(
                    self.catalog
                        .get_component(stack, PatternKey::Activity(name.as_str())),
                ),
                None,
                self.ignore_for(name),
                common.clone(),
            )?;
            register(&mut built, desc);
        }

        // The scheduler detects failure through its own pattern shape
        let scheduler = self.stack.scheduler();
        let desc = ComponentDescriptor::from_parts(
            scheduler,
            None,
            Some(
                self.catalog
                    .get_component(stack, PatternKey::Scheduler(scheduler)),
            ),
            self.ignore_for(scheduler),
            common.clone(),
        )?;
        register(&mut built, desc);

        for name in self.stack.extras() {
            let desc = ComponentDescriptor::from_parts(
                name.clone(),
                Some(
                    self.catalog
                        .get_component(stack, PatternKey::Activity(name.as_str())),
                ),
                None,
                self.ignore_for(name),
                common.clone(),
            )?;
            register(&mut built, desc);
        }

        Ok(built)
    }

    fn ignore_for(&self, name: &str) -> Vec<PatternRule> {
        self.catalog
            .get_component(self.stack.name(), PatternKey::IgnoreSpecific(name))
    }
}

/// Add a descriptor, replacing an existing entry of the same name in place
/// so the original registration position is kept
fn register(built: &mut Vec<ComponentDescriptor>, desc: ComponentDescriptor) {
    match built.iter_mut().find(|d| d.name() == desc.name()) {
        Some(slot) => *slot = desc,
        None => built.push(desc),
    }
}
