//! CLI command implementations
//!
//! Each command loads its inputs, runs the engine once and returns a JSON
//! value; [`run_command`] writes it to stdout.

use std::path::Path;

use serde_json::{json, Value};

use crate::catalog::{product_entity, NewProduct, ProductCatalog, ProductSearch};
use crate::config::EngineConfig;
use crate::criteria::{Criteria, PaginationQuery};
use crate::executor::{MemoryStore, QueryExecutor};
use crate::observability::{Event, Logger};
use crate::schema::EntityRegistry;
use crate::translator::{
    build_query, CriteriaSpecification, ExecutableQuery, ExplainPlan, QueryTranslator,
};

use super::args::{Command, ProductAction, Target};
use super::errors::{CliError, CliResult};
use super::io::{read_input, write_error, write_response, write_text};

/// Main CLI entry point
///
/// Parses arguments and dispatches to the appropriate command. Failures are
/// reported on stdout as an error response and returned to the caller.
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    let result = run_command(cli.command);
    if let Err(e) = &result {
        write_error(e.code_str(), e.message())?;
    }
    result
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Explain {
            schema,
            criteria,
            root,
            text,
        } => {
            let plan = explain(&schema, &criteria, &root)?;
            if text {
                write_text(&plan.to_string())
            } else {
                write_response(serde_json::to_value(&plan)?)
            }
        }
        Command::Query {
            schema,
            data,
            criteria,
            root,
            page,
            limit,
            target,
            config,
        } => {
            let config = load_config(config.as_deref())?;
            let request = QueryRequest {
                schema: &schema,
                data: &data,
                criteria: &criteria,
                root: &root,
                page: PaginationQuery::new(limit, page),
                target,
            };
            write_response(query(&request, &config)?)
        }
        Command::Products { action } => write_response(run_product_action(action)?),
    }
}

fn run_product_action(action: ProductAction) -> CliResult<Value> {
    match action {
        ProductAction::List {
            data,
            page,
            limit,
            config,
        } => {
            let config = load_config(config.as_deref())?;
            products(&data, None, PaginationQuery::new(limit, page), &config)
        }
        ProductAction::Search {
            data,
            search,
            config,
        } => {
            let config = load_config(config.as_deref())?;
            products(&data, Some(&search), PaginationQuery::default(), &config)
        }
        ProductAction::Create {
            data,
            product,
            config,
        } => {
            let config = load_config(config.as_deref())?;
            create_product(&data, &product, &config)
        }
    }
}

/// Load configuration (defaults when no path) and apply its log level
pub fn load_config(path: Option<&Path>) -> CliResult<EngineConfig> {
    let config = match path {
        Some(path) => EngineConfig::load(path).map_err(CliError::config_error)?,
        None => EngineConfig::default(),
    };

    Logger::set_min_severity(config.severity().map_err(CliError::config_error)?);

    let source = path
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "defaults".to_string());
    Logger::trace(Event::ConfigLoaded, &[("source", source.as_str())]);

    Ok(config)
}

/// Load and validate an entity schema file
pub fn load_registry(path: &Path) -> CliResult<EntityRegistry> {
    let registry = EntityRegistry::load(path)?;

    let count = registry.len().to_string();
    let location = path.display().to_string();
    Logger::trace(
        Event::SchemasLoaded,
        &[("entities", count.as_str()), ("source", location.as_str())],
    );

    Ok(registry)
}

/// Translate criteria and describe the outcome.
///
/// A rejected translation is a successful explain with `accepted: false`.
pub fn explain(schema: &Path, criteria: &Path, root: &str) -> CliResult<ExplainPlan> {
    let registry = load_registry(schema)?;
    let criteria: Criteria = read_input(criteria)?;

    let plan = match QueryTranslator::with_shared_factory(&registry).translate(&criteria, root) {
        Ok(query) => ExplainPlan::from_query(&query),
        Err(err) => ExplainPlan::from_error(&err),
    };
    Ok(plan)
}

/// Inputs of the `query` command
#[derive(Debug, Clone)]
pub struct QueryRequest<'a> {
    pub schema: &'a Path,
    pub data: &'a Path,
    pub criteria: &'a Path,
    pub root: &'a str,
    /// Paginates the result when either field is set
    pub page: PaginationQuery,
    pub target: Target,
}

/// Translate criteria with the chosen target and run it against the data file
pub fn query(request: &QueryRequest<'_>, config: &EngineConfig) -> CliResult<Value> {
    let registry = load_registry(request.schema)?;
    let store = MemoryStore::load(request.data)?;
    let criteria: Criteria = read_input(request.criteria)?;

    let query = translate(&criteria, &registry, request.root, request.target)?;

    if request.page.limit.is_none() && request.page.page.is_none() {
        let rows = store.fetch(&query)?;
        return Ok(json!({ "rows": rows }));
    }

    let pagination = request.page.resolve(&config.pagination);
    let page = store.fetch_page(&query, pagination)?;
    Ok(serde_json::to_value(page)?)
}

fn translate(
    criteria: &Criteria,
    registry: &EntityRegistry,
    root: &str,
    target: Target,
) -> CliResult<ExecutableQuery> {
    let query = match target {
        Target::Builder => QueryTranslator::with_shared_factory(registry).translate(criteria, root),
        Target::Specification => {
            build_query(&CriteriaSpecification::from_criteria(criteria), registry, root)
        }
    };
    Ok(query?)
}

/// Search products, or list one page of them when no search is given
pub fn products(
    data: &Path,
    search: Option<&Path>,
    page: PaginationQuery,
    config: &EngineConfig,
) -> CliResult<Value> {
    let registry = EntityRegistry::from_entities([product_entity()])?;
    let mut store = MemoryStore::load(data)?;
    let catalog = ProductCatalog::new(&mut store, &registry, config.pagination);

    match search {
        Some(path) => {
            let search: ProductSearch = read_input(path)?;
            let products = catalog.search(&search)?;
            Ok(json!({ "products": products }))
        }
        None => Ok(serde_json::to_value(catalog.paginated(page)?)?),
    }
}

/// Create a product from a JSON file and save it to the data file
pub fn create_product(data: &Path, product: &Path, config: &EngineConfig) -> CliResult<Value> {
    let registry = EntityRegistry::from_entities([product_entity()])?;
    let mut store = MemoryStore::load(data)?;
    let request: NewProduct = read_input(product)?;

    let created = ProductCatalog::new(&mut store, &registry, config.pagination).create(
        request.name,
        request.price,
        request.quantity,
    )?;
    store.save(data)?;

    Ok(json!({ "product": created }))
}
