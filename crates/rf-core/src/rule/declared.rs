use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::error::{CoreReason, CoreResult, core_error};
use crate::facts::{Facts, Value};

use super::{DEFAULT_NAME, DEFAULT_PRIORITY, Rule, RuleRef};

type ConditionFn = dyn Fn(&Facts, &FactArgs) -> anyhow::Result<bool> + Send + Sync;
type ActionFn = dyn Fn(&mut Facts, &FactArgs) -> anyhow::Result<()> + Send + Sync;
type PriorityFn = dyn Fn() -> i32 + Send + Sync;
type OrderingFn = dyn Fn(&dyn Rule, &dyn Rule) -> Ordering + Send + Sync;

// ---------------------------------------------------------------------------
// FactArgs: tagged parameters resolved from Facts
// ---------------------------------------------------------------------------

/// Values of the fact-tagged parameters of a condition or action, in
/// declaration order.
///
/// Values are copied out of [`Facts`] so an action may mutate the facts while
/// still reading its arguments.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FactArgs {
    args: Vec<(String, Value)>,
}

impl FactArgs {
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.args.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    pub fn value(&self, index: usize) -> Option<&Value> {
        self.args.get(index).map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.args.len()
    }

    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.args.iter().map(|(n, v)| (n.as_str(), v))
    }
}

enum Binding {
    Bound(FactArgs),
    Missing(String),
}

fn bind(params: &[String], facts: &Facts) -> Binding {
    let mut args = Vec::with_capacity(params.len());
    for name in params {
        match facts.get(name) {
            Some(value) => args.push((name.clone(), value.clone())),
            None => return Binding::Missing(name.clone()),
        }
    }
    Binding::Bound(FactArgs { args })
}

// ---------------------------------------------------------------------------
// Condition / Action
// ---------------------------------------------------------------------------

/// The predicate of a declared rule.
///
/// Parameters tagged with [`Condition::fact`] are looked up in [`Facts`] before
/// every call; with no tagged parameter the callable reads the facts handle
/// directly.
#[derive(Clone)]
pub struct Condition {
    id: String,
    params: Vec<String>,
    func: Arc<ConditionFn>,
}

impl Condition {
    pub fn new<F>(id: impl Into<String>, func: F) -> Self
    where
        F: Fn(&Facts, &FactArgs) -> anyhow::Result<bool> + Send + Sync + 'static,
    {
        Self {
            id: id.into(),
            params: Vec::new(),
            func: Arc::new(func),
        }
    }

    /// Tag the next parameter with a fact name.
    pub fn fact(mut self, name: impl Into<String>) -> Self {
        self.params.push(name.into());
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn params(&self) -> &[String] {
        &self.params
    }
}

impl fmt::Debug for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Condition")
            .field("id", &self.id)
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

/// One step of a declared rule's consequence. Actions run in ascending
/// `order`.
#[derive(Clone)]
pub struct Action {
    id: String,
    order: i32,
    params: Vec<String>,
    func: Arc<ActionFn>,
}

impl Action {
    pub fn new<F>(id: impl Into<String>, order: i32, func: F) -> Self
    where
        F: Fn(&mut Facts, &FactArgs) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        Self {
            id: id.into(),
            order,
            params: Vec::new(),
            func: Arc::new(func),
        }
    }

    /// Tag the next parameter with a fact name.
    pub fn fact(mut self, name: impl Into<String>) -> Self {
        self.params.push(name.into());
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn order(&self) -> i32 {
        self.order
    }

    pub fn params(&self) -> &[String] {
        &self.params
    }
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Action")
            .field("id", &self.id)
            .field("order", &self.order)
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// RuleBuilder: declarative rule description
// ---------------------------------------------------------------------------

/// Declarative description of a rule, validated as a whole by [`build`].
///
/// Every call only records what was declared; nothing is rejected before
/// `build`, which reports the first violation as a
/// [`CoreReason::RuleDefinition`] error:
///
/// - exactly one condition,
/// - at most one priority provider,
/// - no blank fact name on any parameter,
/// - at least one action,
/// - pairwise distinct action orders.
///
/// [`build`]: RuleBuilder::build
#[derive(Default)]
pub struct RuleBuilder {
    default_name: Option<String>,
    name: Option<String>,
    description: Option<String>,
    priority: Option<i32>,
    priority_fns: Vec<Arc<PriorityFn>>,
    ordering: Option<Arc<OrderingFn>>,
    conditions: Vec<Condition>,
    actions: Vec<Action>,
}

impl RuleBuilder {
    /// Start a description whose default name is [`DEFAULT_NAME`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a description whose default name is the simple type name of `T`.
    pub fn of<T: ?Sized>() -> Self {
        Self {
            default_name: Some(simple_type_name::<T>().to_string()),
            ..Self::default()
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Static priority metadata; a [`priority_fn`](Self::priority_fn) overrides it.
    pub fn priority(mut self, priority: i32) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Priority computed on every query.
    pub fn priority_fn<F>(mut self, func: F) -> Self
    where
        F: Fn() -> i32 + Send + Sync + 'static,
    {
        self.priority_fns.push(Arc::new(func));
        self
    }

    /// Replace the natural `(priority, name)` order used inside a rule set.
    pub fn ordering<F>(mut self, func: F) -> Self
    where
        F: Fn(&dyn Rule, &dyn Rule) -> Ordering + Send + Sync + 'static,
    {
        self.ordering = Some(Arc::new(func));
        self
    }

    pub fn condition(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    pub fn action(mut self, action: Action) -> Self {
        self.actions.push(action);
        self
    }

    /// Validate the description and turn it into a rule.
    pub fn build(self) -> CoreResult<RuleRef> {
        Ok(Arc::new(self.into_declared()?))
    }

    fn into_declared(self) -> CoreResult<DeclaredRule> {
        let name = self
            .name
            .or(self.default_name)
            .unwrap_or_else(|| DEFAULT_NAME.to_string());

        let invalid =
            |msg: String| core_error(CoreReason::RuleDefinition, format!("rule '{name}': {msg}"));

        let mut conditions = self.conditions;
        let condition = match conditions.len() {
            0 => return Err(invalid("no condition declared".to_string())),
            1 => conditions.remove(0),
            n => {
                return Err(invalid(format!(
                    "{n} conditions declared, exactly one is allowed"
                )));
            }
        };
        if condition.params.iter().any(|p| p.trim().is_empty()) {
            return Err(invalid(format!(
                "condition '{}' has a parameter with a blank fact name",
                condition.id
            )));
        }

        let mut priority_fns = self.priority_fns;
        if priority_fns.len() > 1 {
            return Err(invalid(format!(
                "{} priority providers declared, at most one is allowed",
                priority_fns.len()
            )));
        }

        if self.actions.is_empty() {
            return Err(invalid("no action declared".to_string()));
        }
        let mut seen: HashMap<i32, &str> = HashMap::with_capacity(self.actions.len());
        for action in &self.actions {
            if action.params.iter().any(|p| p.trim().is_empty()) {
                return Err(invalid(format!(
                    "action '{}' has a parameter with a blank fact name",
                    action.id
                )));
            }
            if let Some(other) = seen.insert(action.order, &action.id) {
                return Err(invalid(format!(
                    "actions '{other}' and '{}' share order {}",
                    action.id, action.order
                )));
            }
        }
        let mut actions = self.actions;
        actions.sort_by_key(|a| a.order);

        let description = self.description.unwrap_or_else(|| {
            let ids: Vec<&str> = actions.iter().map(|a| a.id.as_str()).collect();
            format!("when {} then {}", condition.id, ids.join(","))
        });

        Ok(DeclaredRule {
            name,
            description,
            priority: self.priority.unwrap_or(DEFAULT_PRIORITY),
            priority_fn: priority_fns.pop(),
            ordering: self.ordering,
            condition,
            actions,
        })
    }
}

fn simple_type_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

// ---------------------------------------------------------------------------
// DeclaredRule: the adapted rule
// ---------------------------------------------------------------------------

struct DeclaredRule {
    name: String,
    description: String,
    priority: i32,
    priority_fn: Option<Arc<PriorityFn>>,
    ordering: Option<Arc<OrderingFn>>,
    condition: Condition,
    actions: Vec<Action>,
}

impl Rule for DeclaredRule {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn priority(&self) -> i32 {
        match &self.priority_fn {
            Some(func) => func(),
            None => self.priority,
        }
    }

    fn evaluate(&self, facts: &Facts) -> CoreResult<bool> {
        let args = match bind(&self.condition.params, facts) {
            Binding::Bound(args) => args,
            Binding::Missing(fact) => {
                rf_warn!(
                    eval,
                    rule = %self.name,
                    fact = %fact,
                    facts = %facts,
                    "rule evaluated to false due to a declared but missing fact"
                );
                return Ok(false);
            }
        };
        (self.condition.func)(facts, &args).map_err(|e| {
            core_error(
                CoreReason::RuleEvaluation,
                format!(
                    "condition '{}' of rule '{}' failed: {e:#}",
                    self.condition.id, self.name
                ),
            )
        })
    }

    fn execute(&self, facts: &mut Facts) -> CoreResult<()> {
        for action in &self.actions {
            let args = match bind(&action.params, facts) {
                Binding::Bound(args) => args,
                Binding::Missing(fact) => {
                    return Err(core_error(
                        CoreReason::MissingFact,
                        format!(
                            "no fact named '{fact}' for action '{}' of rule '{}' in {facts}",
                            action.id, self.name
                        ),
                    ));
                }
            };
            rf_trace!(exec, rule = %self.name, action = %action.id, "invoking action");
            (action.func)(facts, &args).map_err(|e| {
                core_error(
                    CoreReason::RuleExecution,
                    format!(
                        "action '{}' of rule '{}' failed: {e:#}",
                        action.id, self.name
                    ),
                )
            })?;
        }
        Ok(())
    }

    fn compare(&self, other: &dyn Rule) -> Ordering {
        match &self.ordering {
            Some(func) => func(self as &dyn Rule, other),
            None => super::natural_order(self, other),
        }
    }
}

impl fmt::Debug for DeclaredRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeclaredRule")
            .field("name", &self.name)
            .field("priority", &self.priority())
            .field("condition", &self.condition)
            .field("actions", &self.actions)
            .finish()
    }
}
