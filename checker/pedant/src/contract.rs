//! The call-site enforcement wrapper.

use crate::docstring::{check_docstring, DocstringRecord};
use crate::flag::is_enabled;
use crate::signature_cache;
use pedant_check::{check, CheckContext};
use pedant_diagnostic::{ContractError, ContractResult};
use pedant_resolve::{BindingEnv, Scope};
use pedant_sig::{declaration_lints, ContractFlags, SignatureRecord};
use pedant_types::{FailInfo, FailKind, ValuePath};
use pedant_value::{FunctionKind, FunctionValue, Param, Value};
use std::sync::Arc;
use tracing::debug;

/// Arguments supplied to one call.
///
/// Contracted callables take arguments by name only; `Positional` exists
/// so the wrapper can reject it with a precise count instead of a binding
/// failure further in.
#[derive(Clone, Debug)]
pub enum CallArgs {
    Named(Vec<(Arc<str>, Value)>),
    Positional(Vec<Value>),
}

impl CallArgs {
    pub fn named<N: Into<Arc<str>>>(pairs: Vec<(N, Value)>) -> Self {
        CallArgs::Named(pairs.into_iter().map(|(n, v)| (n.into(), v)).collect())
    }

    pub fn positional(values: Vec<Value>) -> Self {
        CallArgs::Positional(values)
    }

    /// A call with no arguments at all.
    pub fn none() -> Self {
        CallArgs::Named(Vec::new())
    }
}

/// Progress of one invocation through the enforcement pipeline.
///
/// Transitions are linear: `Idle` to `ArgsBound` to `ArgsChecked` to
/// `Executing` to `ReturnChecked` to `Done`. Any checking failure moves to
/// the terminal `Rejected`; a body failure stops at `Executing`. The state
/// a call ended in tells you how far it got, which is what distinguishes
/// "the body never ran" from "the body ran and its result was refused".
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CallState {
    Idle,
    ArgsBound,
    ArgsChecked,
    Executing,
    ReturnChecked,
    Done,
    Rejected,
}

/// Why a call did not produce a value.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum CallFailure {
    /// The contract refused the call, or refused its result.
    #[error(transparent)]
    Contract(#[from] ContractError),
    /// The wrapped body itself failed. Not a contract violation.
    #[error("in function {function}: body failed: {detail}")]
    Execution { function: String, detail: String },
}

/// Builds a [`Contract`], running the decoration-time checks.
pub struct ContractBuilder {
    function: FunctionValue,
    flags: ContractFlags,
    docstring: Option<DocstringRecord>,
}

impl ContractBuilder {
    pub fn new(function: FunctionValue) -> Self {
        ContractBuilder {
            function,
            flags: ContractFlags::empty(),
            docstring: None,
        }
    }

    #[must_use]
    pub fn flags(mut self, flags: ContractFlags) -> Self {
        self.flags = flags;
        self
    }

    #[must_use]
    pub fn docstring(mut self, docstring: DocstringRecord) -> Self {
        self.docstring = Some(docstring);
        self
    }

    /// Run the decoration-time checks and seal the contract.
    ///
    /// With enforcement enabled this introspects the signature eagerly, so
    /// a missing annotation surfaces here rather than at the first call.
    /// Strict-mode declaration lints and docstring drift are also
    /// decoration-time failures. With enforcement disabled, decoration is
    /// free and all of this is skipped.
    pub fn build(self) -> ContractResult<Contract> {
        if is_enabled() {
            let record = signature_cache().get_or_introspect(&self.function)?;
            if let Some(finding) =
                declaration_lints(self.function.name(), &record, self.flags).into_iter().next()
            {
                return Err(finding);
            }
            match &self.docstring {
                Some(doc) => check_docstring(self.function.name(), &record, doc)?,
                None if self.flags.contains(ContractFlags::REQUIRE_DOCSTRING) => {
                    return Err(ContractError::docstring_drift(
                        self.function.name(),
                        "the docstring",
                        "present",
                        "absent",
                    ));
                }
                None => {}
            }
        }
        Ok(Contract {
            function: self.function,
            flags: self.flags,
        })
    }
}

/// A callable with its type contract attached.
///
/// Every call is enforced: arguments must arrive by name, each must
/// conform to its declared type, and the return value must conform to the
/// declared return type. Argument failures abort before the body runs; a
/// return failure is reported after the body already ran.
#[derive(Debug)]
pub struct Contract {
    function: FunctionValue,
    flags: ContractFlags,
}

impl Contract {
    pub fn function(&self) -> &FunctionValue {
        &self.function
    }

    pub fn flags(&self) -> ContractFlags {
        self.flags
    }

    /// Call with no surrounding namespace: forward references resolve
    /// against an empty module scope and type variables are unbound.
    pub fn call(&self, args: CallArgs) -> Result<Value, CallFailure> {
        let scope = Scope::module("__main__");
        self.call_in(args, &scope, &BindingEnv::new())
    }

    /// Call within a resolution scope and type-variable environment.
    pub fn call_in(
        &self,
        args: CallArgs,
        scope: &Scope,
        env: &BindingEnv,
    ) -> Result<Value, CallFailure> {
        self.call_traced(args, scope, env).0
    }

    /// [`call_in`](Contract::call_in), also reporting how far the call
    /// progressed. Diagnostic surface; the value result is identical.
    pub fn call_traced(
        &self,
        args: CallArgs,
        scope: &Scope,
        env: &BindingEnv,
    ) -> (Result<Value, CallFailure>, CallState) {
        // The flag is sampled exactly once; toggles during the call do
        // not apply to it.
        if !is_enabled() {
            let bound = self.bind_unchecked(args);
            return match self.function.invoke(&bound) {
                Ok(value) => (Ok(value), CallState::Done),
                Err(detail) => (Err(self.execution_failure(detail)), CallState::Executing),
            };
        }

        debug!(function = self.function.name(), "enforcing call contract");

        let record = match signature_cache().get_or_introspect(&self.function) {
            Ok(record) => record,
            Err(err) => return (Err(err.into()), CallState::Rejected),
        };

        let bound = match self.bind(&record, args) {
            Ok(bound) => bound,
            Err(err) => return (Err(err.into()), CallState::Rejected),
        };

        let ctx = CheckContext::new(scope, env);
        for (param, (name, value)) in record.params.iter().zip(&bound) {
            let path = ValuePath::arg(name.clone());
            if let Some(info) = check(value, &param.ty, &ctx, &path).fail_info() {
                return (
                    Err(self.verdict_failure(info)),
                    CallState::Rejected,
                );
            }
        }

        let value = match self.function.invoke(&bound) {
            Ok(value) => value,
            Err(detail) => {
                return (Err(self.execution_failure(detail)), CallState::Executing);
            }
        };

        if let Some(info) = check(&value, &record.ret, &ctx, &ValuePath::ret()).fail_info() {
            return (Err(self.verdict_failure(info)), CallState::Rejected);
        }

        (Ok(value), CallState::Done)
    }

    /// Bind named arguments against the signature in declaration order,
    /// filling defaults for omitted parameters. Defaults are not trusted:
    /// they flow through the same argument checks as supplied values.
    fn bind(
        &self,
        record: &SignatureRecord,
        args: CallArgs,
    ) -> ContractResult<Vec<(Arc<str>, Value)>> {
        let name = self.function.name();
        let supplied = match args {
            CallArgs::Positional(values) if !values.is_empty() => {
                return Err(ContractError::positional_rejected(name, values.len()));
            }
            CallArgs::Positional(_) => Vec::new(),
            CallArgs::Named(pairs) => pairs,
        };

        for (i, (arg, _)) in supplied.iter().enumerate() {
            if supplied[..i].iter().any(|(prior, _)| prior == arg) {
                return Err(ContractError::argument_binding(
                    name,
                    format!("argument '{arg}' supplied more than once"),
                ));
            }
            if record.param(arg).is_none() {
                return Err(ContractError::argument_binding(
                    name,
                    format!("unexpected argument '{arg}'"),
                ));
            }
        }

        let mut bound = Vec::with_capacity(record.params.len());
        for param in &record.params {
            if let Some((_, value)) = supplied.iter().find(|(n, _)| *n == param.name) {
                bound.push((param.name.clone(), value.clone()));
            } else if let Some(default) = self.default_for(&param.name) {
                bound.push((param.name.clone(), default));
            } else {
                return Err(ContractError::argument_binding(
                    name,
                    format!("missing required argument '{}'", param.name),
                ));
            }
        }
        Ok(bound)
    }

    /// Disabled-mode binding: no validation, positional arguments are
    /// zipped onto parameter names, defaults still fill omissions.
    fn bind_unchecked(&self, args: CallArgs) -> Vec<(Arc<str>, Value)> {
        let params = self.effective_params();
        match args {
            CallArgs::Positional(values) => params
                .iter()
                .zip(values)
                .map(|(param, value)| (param.name.clone(), value))
                .collect(),
            CallArgs::Named(pairs) => {
                let mut bound = pairs;
                for param in params {
                    if bound.iter().any(|(n, _)| *n == param.name) {
                        continue;
                    }
                    if let Some(default) = param.default.clone() {
                        bound.push((param.name.clone(), default));
                    }
                }
                bound
            }
        }
    }

    /// Caller-facing parameters: a bound method's leading self slot is
    /// not caller-supplied.
    fn effective_params(&self) -> &[Param] {
        match self.function.kind() {
            FunctionKind::Method { bound: true } => {
                self.function.params().get(1..).unwrap_or(&[])
            }
            _ => self.function.params(),
        }
    }

    fn default_for(&self, name: &str) -> Option<Value> {
        self.function
            .params()
            .iter()
            .find(|p| &*p.name == name)
            .and_then(|p| p.default.clone())
    }

    fn execution_failure(&self, detail: String) -> CallFailure {
        CallFailure::Execution {
            function: self.function.name().to_owned(),
            detail,
        }
    }

    /// Map a check failure onto the error taxonomy.
    fn verdict_failure(&self, info: &FailInfo) -> CallFailure {
        let name = self.function.name();
        let err = match info.kind {
            FailKind::Mismatch => ContractError::type_mismatch(
                name,
                info.path.to_string(),
                info.expected.clone(),
                info.actual.clone(),
                &info.reason,
            ),
            FailKind::UnresolvedForwardRef => ContractError::unresolved_forward_reference(
                name,
                info.expected.trim_matches('\''),
                &info.reason,
            ),
            FailKind::ForwardRefCycle => ContractError::forward_reference_cycle(
                name,
                info.expected.trim_matches('\''),
                &info.reason,
            ),
        };
        CallFailure::Contract(err)
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
mod tests {
    use super::*;
    use pedant_diagnostic::ContractErrorKind;
    use pedant_types::TypeExpr;
    use pedant_value::CallBody;
    use pretty_assertions::assert_eq;

    fn doubler() -> FunctionValue {
        let body: CallBody = Arc::new(|args| match &args[0].1 {
            Value::Int(n) => Ok(Value::int(n * 2)),
            other => Err(format!("unexpected input {other:?}")),
        });
        FunctionValue::new(
            "double",
            vec![Param::new("n", TypeExpr::int())],
            Some(TypeExpr::int()),
            body,
        )
    }

    fn contract(f: FunctionValue) -> Contract {
        ContractBuilder::new(f).build().unwrap()
    }

    #[test]
    fn conforming_call_returns_the_value() {
        let c = contract(doubler());
        let out = c.call(CallArgs::named(vec![("n", Value::int(21))])).unwrap();
        assert_eq!(out, Value::int(42));
    }

    #[test]
    fn positional_call_is_rejected_before_binding() {
        let c = contract(doubler());
        let err = c.call(CallArgs::positional(vec![Value::int(21)])).unwrap_err();
        let CallFailure::Contract(err) = err else {
            panic!("expected a contract failure");
        };
        assert_eq!(
            err.kind,
            ContractErrorKind::PositionalArgumentRejected { count: 1 }
        );
    }

    #[test]
    fn unexpected_argument_fails_binding() {
        let c = contract(doubler());
        let err = c
            .call(CallArgs::named(vec![
                ("n", Value::int(1)),
                ("m", Value::int(2)),
            ]))
            .unwrap_err();
        let CallFailure::Contract(err) = err else {
            panic!("expected a contract failure");
        };
        assert!(matches!(err.kind, ContractErrorKind::ArgumentBinding { .. }));
        assert!(err.message.contains("'m'"));
    }

    #[test]
    fn missing_argument_fails_binding() {
        let c = contract(doubler());
        let err = c.call(CallArgs::none()).unwrap_err();
        let CallFailure::Contract(err) = err else {
            panic!("expected a contract failure");
        };
        assert!(err.message.contains("missing required argument 'n'"));
    }

    #[test]
    fn duplicate_argument_fails_binding() {
        let c = contract(doubler());
        let err = c
            .call(CallArgs::named(vec![
                ("n", Value::int(1)),
                ("n", Value::int(2)),
            ]))
            .unwrap_err();
        let CallFailure::Contract(err) = err else {
            panic!("expected a contract failure");
        };
        assert!(err.message.contains("more than once"));
    }

    #[test]
    fn mismatched_argument_rejects_without_running_the_body() {
        let ran = Arc::new(std::sync::atomic::AtomicBool::new(false));
        let observer = ran.clone();
        let body: CallBody = Arc::new(move |_| {
            observer.store(true, std::sync::atomic::Ordering::SeqCst);
            Ok(Value::None)
        });
        let f = FunctionValue::new(
            "f",
            vec![Param::new("n", TypeExpr::int())],
            Some(TypeExpr::None),
            body,
        );
        let c = contract(f);

        let scope = Scope::module("m");
        let env = BindingEnv::new();
        let (result, state) = c.call_traced(
            CallArgs::named(vec![("n", Value::string("nope"))]),
            &scope,
            &env,
        );
        assert!(result.is_err());
        assert_eq!(state, CallState::Rejected);
        assert!(!ran.load(std::sync::atomic::Ordering::SeqCst));
    }

    #[test]
    fn defaults_fill_omitted_arguments_and_are_checked() {
        let body: CallBody = Arc::new(|args| Ok(args[0].1.clone()));
        let good = FunctionValue::new(
            "good",
            vec![Param::new("n", TypeExpr::int()).with_default(Value::int(7))],
            Some(TypeExpr::int()),
            body.clone(),
        );
        let c = contract(good);
        assert_eq!(c.call(CallArgs::none()).unwrap(), Value::int(7));

        // A default that violates its own annotation is caught the first
        // time it is actually used.
        let bad = FunctionValue::new(
            "bad",
            vec![Param::new("n", TypeExpr::int()).with_default(Value::string("seven"))],
            Some(TypeExpr::int()),
            body,
        );
        let c = contract(bad);
        assert!(c.call(CallArgs::named(vec![("n", Value::int(1))])).is_ok());
        let err = c.call(CallArgs::none()).unwrap_err();
        let CallFailure::Contract(err) = err else {
            panic!("expected a contract failure");
        };
        assert_eq!(err.kind, ContractErrorKind::TypeMismatch);
        assert_eq!(err.path, "n");
    }

    #[test]
    fn return_mismatch_surfaces_after_the_body_ran() {
        let count = Arc::new(std::sync::atomic::AtomicUsize::new(0));
        let observer = count.clone();
        let body: CallBody = Arc::new(move |_| {
            observer.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            Ok(Value::string("not an int"))
        });
        let f = FunctionValue::new("f", vec![], Some(TypeExpr::int()), body);
        let c = contract(f);

        let scope = Scope::module("m");
        let env = BindingEnv::new();
        let (result, state) = c.call_traced(CallArgs::none(), &scope, &env);
        let Err(CallFailure::Contract(err)) = result else {
            panic!("expected a contract failure");
        };
        assert_eq!(err.kind, ContractErrorKind::TypeMismatch);
        assert_eq!(err.path, "return");
        assert_eq!(state, CallState::Rejected);
        // The side effect happened; rejection of the result cannot undo it.
        assert_eq!(count.load(std::sync::atomic::Ordering::SeqCst), 1);
    }

    #[test]
    fn body_failure_is_not_a_contract_violation() {
        let body: CallBody = Arc::new(|_| Err("boom".to_owned()));
        let f = FunctionValue::new("f", vec![], Some(TypeExpr::None), body);
        let c = contract(f);
        let err = c.call(CallArgs::none()).unwrap_err();
        assert!(matches!(err, CallFailure::Execution { ref detail, .. } if detail == "boom"));
    }

    #[test]
    fn decoration_rejects_missing_annotations_eagerly() {
        let body: CallBody = Arc::new(|_| Ok(Value::None));
        let f = FunctionValue::new("f", vec![Param::untyped("a")], Some(TypeExpr::None), body);
        let err = ContractBuilder::new(f).build().unwrap_err();
        assert_eq!(
            err.kind,
            ContractErrorKind::MissingAnnotation {
                name: "a".to_owned()
            }
        );
    }

    #[test]
    fn strict_flag_rejects_bare_containers_at_decoration() {
        let body: CallBody = Arc::new(|_| Ok(Value::None));
        let f = FunctionValue::new(
            "f",
            vec![Param::new(
                "xs",
                TypeExpr::bare(pedant_types::ContainerKind::List),
            )],
            Some(TypeExpr::None),
            body,
        );
        let err = ContractBuilder::new(f)
            .flags(ContractFlags::STRICT_TYPE_ARGS)
            .build()
            .unwrap_err();
        assert!(matches!(
            err.kind,
            ContractErrorKind::StrictDeclaration { .. }
        ));
    }

    #[test]
    fn require_docstring_flag_rejects_undocumented_functions() {
        let err = ContractBuilder::new(doubler())
            .flags(ContractFlags::REQUIRE_DOCSTRING)
            .build()
            .unwrap_err();
        assert!(matches!(err.kind, ContractErrorKind::DocstringDrift { .. }));
    }

    #[test]
    fn docstring_drift_is_a_decoration_failure() {
        let err = ContractBuilder::new(doubler())
            .docstring(DocstringRecord::new().param("n", "str").returns("int"))
            .build()
            .unwrap_err();
        assert!(matches!(err.kind, ContractErrorKind::DocstringDrift { .. }));

        let ok = ContractBuilder::new(doubler())
            .docstring(DocstringRecord::new().param("n", "int").returns("int"));
        assert!(ok.build().is_ok());
    }

    #[test]
    fn bound_method_calls_skip_self() {
        let body: CallBody = Arc::new(|args| {
            assert_eq!(&*args[0].0, "x");
            Ok(args[0].1.clone())
        });
        let f = FunctionValue::new(
            "method",
            vec![Param::untyped("self"), Param::new("x", TypeExpr::int())],
            Some(TypeExpr::int()),
            body,
        )
        .with_kind(FunctionKind::Method { bound: true });
        let c = contract(f);
        let out = c.call(CallArgs::named(vec![("x", Value::int(3))])).unwrap();
        assert_eq!(out, Value::int(3));
    }
}
