//! Built-in rule table for Gecko main-thread profiles.
//!
//! `(pattern, bucket)` in priority order.

pub const DEFAULT_RULES: &[(&str, &str)] = &[
    (r"^mach_msg_trap", "idle"),
    (r"ResolveStyleContext", "css:resolve"),
    (r"ProcessPendingRestyles", "css:restyle"),
    (r"^nsRuleNode::WalkRuleTree", "css:walkrtree"),
    (r"ProcessReflowCommands", "reflow"),
    (r"^PresShell::Paint", "paint"),
    (
        r"^js::frontend::CompileScript|createScriptForLazilyInterpretedFunction",
        "jit:*",
    ),
    (r"^js::jit::BaselineCompile", "jit:base"),
    (r"^js::jit::IonBuilder::build", "jit:ion"),
    (r"^js::InternalCallOrConstruct|^JS::Call|^js::RunScript", "js:run:*"),
    (r"^Interpret", "js:interpret"),
    (r"^EnterBaseline", "js:base"),
    (r"^js::jit::IonCannon", "js:ion"),
    (r"^BytecodeCompiler::compileScript", "parse:js"),
    (r"^js::gc::GCRuntime::minorGCImpl", "gc:nursery"),
    (r"^nsJSContext::GarbageCollectNow", "gc:collect"),
];
