//! `FunctionPrototype` — spec §3: "(fully-qualified name, parameter list
//! with (name, type, optional?, variadic?, initializer?, binding-pattern?),
//! return type, is-generic?, has-captures?, has-extra-fields?,
//! has-no-body?, discovered?)".

use ecmair_ast::{BindingPattern, NodeId};
use ecmair_common::interner::Atom;
use ecmair_symbols::{FunctionId, TypeId};

#[derive(Clone, Debug)]
pub struct ParamPrototype {
    pub name: Atom,
    pub ty: TypeId,
    pub optional: bool,
    pub variadic: bool,
    pub initializer: Option<NodeId>,
    pub binding_pattern: Option<BindingPattern>,
}

#[derive(Clone, Debug)]
pub struct FunctionPrototype {
    pub full_name: Atom,
    pub params: Vec<ParamPrototype>,
    pub return_type: TypeId,
    pub is_generic: bool,
    pub has_captures: bool,
    pub has_extra_fields: bool,
    pub has_no_body: bool,
    pub discovered: bool,
}

impl FunctionPrototype {
    pub fn new(full_name: Atom, params: Vec<ParamPrototype>, return_type: TypeId) -> Self {
        FunctionPrototype {
            full_name,
            params,
            return_type,
            is_generic: false,
            has_captures: false,
            has_extra_fields: false,
            has_no_body: false,
            discovered: false,
        }
    }

    /// Prepend the synthesized capture-tuple parameter (spec §4.6: "the
    /// prototype is rewritten to prepend one parameter holding a pointer to
    /// a capture tuple"). Named `.captured` to match the field name closures
    /// read it back through (`this..captured`, spec §4.6).
    pub fn prepend_capture_param(&mut self, capture_param_type: TypeId, name: Atom) {
        self.params.insert(
            0,
            ParamPrototype {
                name,
                ty: capture_param_type,
                optional: false,
                variadic: false,
                initializer: None,
                binding_pattern: None,
            },
        );
        self.has_captures = true;
    }
}

pub struct FunctionArena {
    protos: Vec<FunctionPrototype>,
}

impl Default for FunctionArena {
    fn default() -> Self {
        Self::new()
    }
}

impl FunctionArena {
    pub fn new() -> Self {
        FunctionArena { protos: Vec::new() }
    }

    pub fn register(&mut self, proto: FunctionPrototype) -> FunctionId {
        let id = FunctionId(self.protos.len() as u32);
        self.protos.push(proto);
        id
    }

    pub fn get(&self, id: FunctionId) -> &FunctionPrototype {
        &self.protos[id.index()]
    }

    pub fn get_mut(&mut self, id: FunctionId) -> &mut FunctionPrototype {
        &mut self.protos[id.index()]
    }
}
