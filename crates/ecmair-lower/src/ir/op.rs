//! The op sum — spec §4.1: "each op has a location, zero or more typed
//! operand values, zero or more typed results, and optional attributes."
//! Grouped into the families spec §4.1 lists (values / memory /
//! arithmetic-logical / control / exceptions / interfaces-vtables /
//! closures), plus a `Call` op: the spec's families don't name one
//! explicitly, but §4.3's lowering policies ("Binary `=` dispatches...",
//! call sites referencing distinct symbols in §8 scenario 1) require a
//! call-site op to exist.

use ecmair_common::interner::Atom;
use ecmair_common::span::Span;
use ecmair_symbols::{ClassId, FunctionId, GlobalId, InterfaceId, NamespaceId, OpId, TypeId};
use ecmair_types::LiteralValue;

/// An SSA-style value reference: the `OpId` of the op that produced it.
/// Every op also has a result `TypeId` (`Void` for effect-only ops), so a
/// `Value` carries its type implicitly through `OpArena::type_of`.
pub type Value = OpId;

/// A nested sequence of ops at one structuring level (an `if`'s then-arm, a
/// loop body, ...). Spec §4.1 models control ops as holding *regions*
/// directly (`if(cond, then-region, else-region?)`), not as jumps between
/// flat basic blocks — this is a direct, deliberate simplification of the
/// "final IR-to-machine-code lowering passes" concern (out of scope per
/// spec §1) down to the structured-region shape the spec actually
/// describes.
pub type Region = Vec<OpId>;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ArithOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Exp,
    BitAnd,
    BitOr,
    BitXor,
    Shl,
    Shr,
    UShr,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    NotEq,
    StrictEq,
    StrictNotEq,
    Lt,
    Lte,
    Gt,
    Gte,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LogicalOp {
    And,
    Or,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ArithUnaryOp {
    Neg,
    Plus,
    BitNot,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum IncDecOp {
    Increment,
    Decrement,
}

#[derive(Clone, Debug)]
pub struct SwitchCase {
    /// `None` is the `default:` case.
    pub test: Option<Value>,
    pub body: Region,
}

#[derive(Clone, Debug)]
pub struct CatchClause {
    pub exception_ref: Value,
    pub body: Region,
}

#[derive(Clone, Debug)]
pub enum OpKind {
    // ---- values ----
    Constant(LiteralValue),
    Undef,
    Null,
    ThisRef,
    SymbolRef(FunctionId),
    ClassRef(ClassId),
    InterfaceRef(InterfaceId),
    NamespaceRef(NamespaceId),

    // ---- memory ----
    Variable { initial: Option<Value>, captured: bool },
    Param { index: usize, captured: bool },
    ParamOptional { index: usize, default_region: Region, captured: bool },
    Load(Value),
    Store { value: Value, target: Value },
    AddressOf(GlobalId),
    ElementRef { array: Value, index: Value },
    PointerOffsetRef { base: Value, offset_path: Vec<usize> },
    New { class: ClassId, on_stack: bool },
    NewArray { element_type: TypeId, length: Value },
    GcNewTyped { class: ClassId, descriptor: GlobalId },

    // ---- arithmetic / logical ----
    ArithBinary { op: ArithOp, lhs: Value, rhs: Value },
    Compare { op: CompareOp, lhs: Value, rhs: Value },
    LogicalBinary { op: LogicalOp, lhs: Value, rhs: Value },
    ArithUnary { op: ArithUnaryOp, operand: Value },
    PrefixUnary { op: IncDecOp, operand: Value },
    PostfixUnary { op: IncDecOp, operand: Value },
    StringConcat(Vec<Value>),
    TypeOf(Value),
    SizeOf(TypeId),
    Cast { value: Value, target: TypeId },
    Call { callee: Value, args: Vec<Value> },

    // ---- control ----
    If { cond: Value, then_region: Region, else_region: Option<Region> },
    While { cond_region: Region, body_region: Region },
    DoWhile { body_region: Region, cond_region: Region },
    For { cond_region: Region, body_region: Region, incr_region: Region },
    Switch { discriminant: Value, cases: Vec<SwitchCase> },
    Label(Atom),
    Break(Option<Atom>),
    Continue(Option<Atom>),
    Result(Vec<Value>),
    Condition(Value),
    NoCondition,
    Return,
    ReturnVal(Value),
    YieldReturnVal(Value),
    Exit(Option<Value>),
    /// `entry(refOrVoid)`: the function body's entry marker, carrying the
    /// return-value slot `return` statements store through, or `None` for
    /// a void-returning function.
    Entry(Option<Value>),
    Unreachable,

    // ---- exceptions ----
    Try { body: Region, catches: Vec<CatchClause>, finally: Option<Region> },
    Throw(Value),
    Catch(Value),
    Invoke { callee: Value, args: Vec<Value>, normal_dest: Region, unwind_dest: Region },

    // ---- interfaces / vtables ----
    VtableOffsetRef { vtable: Value, index: usize },
    VirtualSymbolRef { vtable: Value, index: usize },
    ThisSymbolRef(FunctionId),
    ThisVirtualSymbolRef(usize),
    InterfaceSymbolRef { interface: InterfaceId, index: usize },
    ExtractInterfaceThis(Value),
    NewInterface { this: Value, vtable_ptr: Value },

    // ---- closures ----
    Capture(Vec<Value>),
    CreateBoundFunction { this: Value, func: Value },
    GetThis,
    GetMethod { this: Value, name: Atom },
}

#[derive(Clone, Debug)]
pub struct Op {
    pub span: Span,
    pub ty: TypeId,
    pub kind: OpKind,
}
