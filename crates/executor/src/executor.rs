//! The Executor - single entry point to the docmend engine.
//!
//! The Executor routes commands to the handler for each operation, resolving
//! collection names through the catalog and converting results to outputs.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{debug, info, warn};

use docmend_engine::{Catalog, Clock, EngineConfig, Gateway, Mutator, SystemClock, TtlCache};

use crate::handlers;
use crate::{Command, Context, Output, Result};

/// The command executor - single entry point to the docmend engine.
///
/// The Executor keeps no documents between commands. Its only state is the
/// statistics cache; everything else lives in the collections.
///
/// # Thread Safety
///
/// Executor is `Send + Sync` and can be shared across threads.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use docmend_engine::{Catalog, EngineConfig, MemoryCollection};
/// use docmend_executor::{Command, Context, Executor, Output};
///
/// let catalog = Arc::new(Catalog::new());
/// catalog.register(Arc::new(MemoryCollection::new("forms")));
/// let executor = Executor::new(catalog, &EngineConfig::default());
///
/// let out = executor.execute(&Context::new("ops"), Command::Collections).unwrap();
/// assert_eq!(out, Output::Collections(vec!["forms".to_string()]));
/// ```
pub struct Executor {
    catalog: Arc<Catalog>,
    gateway: Gateway,
    stats: TtlCache<BTreeMap<String, usize>>,
}

impl std::fmt::Debug for Executor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Executor")
            .field("catalog", &self.catalog)
            .field("gateway", &self.gateway)
            .finish_non_exhaustive()
    }
}

impl Executor {
    /// Create an executor over a catalog, on the wall clock
    pub fn new(catalog: Arc<Catalog>, config: &EngineConfig) -> Self {
        Self::with_clock(catalog, config, Arc::new(SystemClock))
    }

    /// Create an executor whose status dates and cache expiry use `clock`
    pub fn with_clock(catalog: Arc<Catalog>, config: &EngineConfig, clock: Arc<dyn Clock>) -> Self {
        let mutator = Mutator::new(config).with_clock(clock.clone());
        Executor {
            catalog,
            gateway: Gateway::new(mutator),
            stats: TtlCache::with_clock(config.stats_ttl(), clock),
        }
    }

    /// The catalog commands resolve collection names against
    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    /// Execute a single command.
    ///
    /// Returns the command result or an error.
    pub fn execute(&self, ctx: &Context, cmd: Command) -> Result<Output> {
        let name = cmd.name();
        if cmd.wants_save() && !ctx.save_allowed {
            info!(
                target: "docmend::executor",
                actor = %ctx.actor,
                command = name,
                "Save not permitted, running as dry run"
            );
        }
        debug!(target: "docmend::executor", actor = %ctx.actor, command = name, "Executing");

        let result = self.dispatch(ctx, cmd);
        match &result {
            Ok(output) => info!(
                target: "docmend::executor",
                actor = %ctx.actor,
                command = name,
                persisted = output.persisted(),
                "Command completed"
            ),
            Err(e) => warn!(
                target: "docmend::executor",
                actor = %ctx.actor,
                command = name,
                kind = %e.kind(),
                error = %e,
                "Command failed"
            ),
        }
        result
    }

    /// Execute commands in order, collecting every result.
    ///
    /// A failing command does not stop the ones after it.
    pub fn execute_many(&self, ctx: &Context, cmds: Vec<Command>) -> Vec<Result<Output>> {
        cmds.into_iter().map(|cmd| self.execute(ctx, cmd)).collect()
    }

    fn dispatch(&self, ctx: &Context, cmd: Command) -> Result<Output> {
        let catalog = &self.catalog;
        let gateway = &self.gateway;
        match cmd {
            // Reads
            Command::Find { collection, query } => {
                handlers::document::find(catalog, gateway, &collection, query)
            }
            Command::Read {
                collection,
                query,
                path,
            } => handlers::document::read(catalog, gateway, &collection, query, &path),

            // Change descriptors
            Command::Update {
                collection,
                query,
                changes,
                many,
                save,
            } => handlers::mutate::update(
                catalog,
                gateway,
                &collection,
                query,
                changes,
                many,
                ctx.persist(save),
            ),

            // Array operations
            Command::AppendWithIds {
                collection,
                query,
                path,
                value,
                substitute,
                save,
            } => handlers::array::append_with_ids(
                catalog,
                gateway,
                &collection,
                query,
                &path,
                value,
                substitute,
                ctx.persist(save),
            ),
            Command::Inject {
                collection,
                query,
                path,
                values,
                locale,
                save,
            } => handlers::array::inject(
                catalog,
                gateway,
                &collection,
                query,
                &path,
                values,
                locale,
                ctx.persist(save),
            ),
            Command::Duplicate {
                collection,
                query,
                path,
                save,
            } => handlers::array::duplicate(
                catalog,
                gateway,
                &collection,
                query,
                &path,
                ctx.persist(save),
            ),
            Command::FindDuplicates {
                collection,
                query,
                path,
                key,
            } => handlers::array::find_duplicates(catalog, gateway, &collection, query, &path, key),
            Command::RemoveDuplicates {
                collection,
                query,
                path,
                key,
                save,
            } => handlers::array::remove_duplicates(
                catalog,
                gateway,
                &collection,
                query,
                &path,
                key,
                ctx.persist(save),
            ),
            Command::RemoveElement {
                collection,
                query,
                path,
                save,
            } => handlers::array::remove_element(
                catalog,
                gateway,
                &collection,
                query,
                &path,
                ctx.persist(save),
            ),

            // Documents
            Command::Create {
                collection,
                documents,
                save,
            } => handlers::document::create(
                catalog,
                gateway,
                &collection,
                documents,
                ctx.persist(save),
            ),
            Command::Delete {
                collection,
                query,
                save,
            } => handlers::document::delete(catalog, gateway, &collection, query, ctx.persist(save)),

            // Cross-collection
            Command::Transfer {
                from,
                query,
                link_field,
                from_field,
                to,
                to_field,
                save,
            } => handlers::transfer::transfer(
                catalog,
                gateway,
                handlers::transfer::TransferArgs {
                    from: &from,
                    query,
                    link_field: &link_field,
                    from_field: &from_field,
                    to: &to,
                    to_field: &to_field,
                },
                ctx.persist(save),
            ),

            // Administration
            Command::Stats => handlers::admin::stats(catalog, &self.stats),
            Command::Collections => Ok(Output::Collections(catalog.names())),
        }
    }
}
