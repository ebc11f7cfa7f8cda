//! Top-level orchestration: tying a binder's class declarations to the
//! layout passes in `ecmair-sem::layout` and producing a finished
//! `CompiledModule`.
//!
//! The front-end parser and binder are external collaborators (spec §1's
//! Non-goals): this module does not walk raw `ecmair_ast::NodeKind` trees
//! itself. Instead it accepts the already-bound shape a binder produces —
//! a class's name, bases, interfaces and field list — and drives every
//! downstream step this crate owns: registration in the namespace table,
//! storage-tuple construction, vtable/RTTI/GC-descriptor planning, and
//! finally IR emission through `ecmair-lower`. Wiring an actual AST walker
//! on top of this is future work tracked in DESIGN.md, not a gap in this
//! layer's own responsibilities.

use crate::session::CompilationSession;
use ecmair_common::diagnostics::Diagnostic;
use ecmair_common::span::Span;
use ecmair_lower::ir::{Builder, OpArena};
use ecmair_lower::lower::{emit_class_members, ClassEmission, ClassGlobals};
use ecmair_sem::class::{ClassFlags, ClassInfo, FieldInfo, ImplementedInterface};
use ecmair_sem::layout::{build_gc_descriptor, build_rtti_plan, build_storage_tuple, build_vtable, GcDescriptor, RttiPlan, VtableEntry};
use ecmair_symbols::{ClassId, FunctionId, InterfaceId, NamespaceId, TypeId};

/// A single field as a binder would hand it to us: a name, a resolved
/// type, and whether it's a `static` member.
pub struct FieldDeclaration {
    pub name: String,
    pub ty: TypeId,
    pub is_static: bool,
    /// Only meaningful when `is_static`: the binder marks a static field
    /// this way when it decides the field belongs in the vtable rather
    /// than as a plain module global (spec §4.5's vtable-order clause).
    pub is_vtable_resident: bool,
}

/// A class declaration, post name/type resolution but pre-layout. Mirrors
/// the subset of `ecmair_ast::NodeKind::ClassDeclaration` this crate's
/// passes actually consume.
pub struct ClassDeclaration {
    pub name: String,
    pub base: Option<ClassId>,
    pub interfaces: Vec<InterfaceId>,
    pub fields: Vec<FieldDeclaration>,
    pub is_abstract: bool,
    pub has_rtti: bool,
}

/// What `declare_and_layout_class` computed for one class, handed back so
/// the caller (eventually `ecmair-lower`) can emit its IR: globals,
/// vtable, storage layout, and RTTI synthesis plan.
pub struct ClassLayout {
    pub class: ClassId,
    pub storage_type: TypeId,
    pub vtable: Vec<VtableEntry>,
    pub gc_descriptor: GcDescriptor,
    pub rtti_plan: Option<RttiPlan>,
    pub globals: ClassGlobals,
    pub emission: ClassEmission,
}

/// Mint this class's three synthesized `GlobalId`s deterministically from
/// its own id, the same ad-hoc-numbering approach `ecmair-lower`'s
/// exception-ABI emission uses for its runtime entry points: no registry,
/// just a fixed offset per class so two classes never collide.
fn class_globals(class: ClassId) -> ClassGlobals {
    let base = class.0 * 3;
    ClassGlobals { rtti: ecmair_symbols::GlobalId(base), vtable: ecmair_symbols::GlobalId(base + 1), typedescr: ecmair_symbols::GlobalId(base + 2) }
}

/// Register `decl` in `session`'s class arena and namespace table, then
/// run spec §4.5's layout passes in dependency order: storage tuple first
/// (vtable presence is a per-field decision this crate makes declaratively
/// via `is_abstract`/interfaces, not computed from storage), then vtable,
/// GC descriptor, and RTTI plan, which all read the now-complete
/// `ClassInfo`.
#[tracing::instrument(level = "debug", skip(session, decl), fields(class_name = %decl.name, field_count = decl.fields.len()))]
pub fn declare_and_layout_class(session: &mut CompilationSession, ns: NamespaceId, decl: ClassDeclaration) -> ClassLayout {
    let name_atom = session.interner.intern(&decl.name);
    let parent_full_name = session.interner.resolve(session.namespaces.get(ns).full_name).to_string();
    let full_name_atom = session.interner.intern_qualified(&parent_full_name, &decl.name);

    // `class_type` is self-referential (`TypeKind::Class(ClassId)`), so the
    // class must be registered once to mint an id before the real type can
    // be interned and patched back in.
    let class_id = session.classes.register(ClassInfo::new(name_atom, full_name_atom, TypeId::NONE));
    let class_type = session.types.intern(ecmair_types::TypeKind::Class(class_id));

    let info = session.classes.get_mut(class_id);
    info.class_type = class_type;
    if let Some(base) = decl.base {
        info.bases.push(base);
    }
    let has_vtable = decl.is_abstract || !decl.interfaces.is_empty() || decl.base.is_some();
    if has_vtable {
        info.flags.insert(ClassFlags::HAS_VIRTUAL_TABLE);
    }
    if decl.has_rtti {
        info.flags.insert(ClassFlags::HAS_RTTI);
    }
    if decl.is_abstract {
        info.flags.insert(ClassFlags::IS_ABSTRACT);
    }
    for (index, interface) in decl.interfaces.into_iter().enumerate() {
        info.implemented_interfaces.push(ImplementedInterface { interface, vtable_index: index });
    }
    for field in decl.fields {
        let field_name = session.interner.intern(&field.name);
        session.classes.get_mut(class_id).fields.push(FieldInfo {
            name: field_name,
            ty: field.ty,
            is_static: field.is_static,
            is_ctor_promoted: false,
            is_vtable_resident: field.is_static && field.is_vtable_resident,
        });
    }

    session.namespaces.register_class(ns, name_atom, class_id);

    let storage_type = build_storage_tuple(&mut session.classes, &mut session.types, class_id);
    let vtable = build_vtable(&session.classes, class_id);
    let gc_descriptor = build_gc_descriptor(&session.classes, &session.types, class_id);
    let rtti_plan = build_rtti_plan(&session.classes, &session.interner, class_id);
    tracing::debug!(
        class = class_id.index(),
        vtable_entries = vtable.len(),
        has_rtti_plan = rtti_plan.is_some(),
        packs_to_constant = gc_descriptor.as_packed_i64().is_some(),
        "class layout computed"
    );
    // Mirrors `class_globals`'s ad-hoc numbering: a base class's synthesized
    // `.instanceOf` lives at `FunctionId(base.0)`, so a derived class's own
    // body can call straight into it without a function registry.
    let super_instance_of_func = rtti_plan.as_ref().and_then(|plan| plan.super_instance_of).map(|base| FunctionId(base.0));
    let globals = class_globals(class_id);

    let mut builder = Builder::new(&mut session.ops);
    let emission = emit_class_members(
        &mut builder,
        Span::synthetic(),
        class_id,
        class_type,
        session.types.boolean,
        session.types.string,
        session.types.bigint,
        session.types.opaque,
        has_vtable,
        rtti_plan.as_ref(),
        &gc_descriptor,
        &globals,
        super_instance_of_func,
    );

    ClassLayout { class: class_id, storage_type, vtable, gc_descriptor, rtti_plan, globals, emission }
}

/// The finished result of a compilation job: the emitted IR and whatever
/// class layouts were computed along the way. Spec §6: "a single IR module
/// whose ops and types are listed in §4.1 ... global state includes
/// static-class fields, class RTTI strings, class vtables, interface-for-
/// class vtables, typed-GC descriptors, and exception-ABI tables."
pub struct CompiledModule {
    pub ops: OpArena,
    pub class_layouts: Vec<ClassLayout>,
}

/// Drain a session into its finished module, or its buffered diagnostics
/// on failure (spec §7: "messages are buffered ... flushed only on
/// confirmed failure").
pub fn finish(session: CompilationSession, class_layouts: Vec<ClassLayout>) -> Result<CompiledModule, Vec<Diagnostic>> {
    if session.diagnostics.has_errors() {
        return Err(session.diagnostics.into_diagnostics());
    }
    Ok(CompiledModule { ops: session.ops, class_layouts })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ecmair_common::config::CompilerConfig;

    #[test]
    fn declaring_a_class_with_no_base_and_no_interfaces_has_no_vtable() {
        let mut session = CompilationSession::new(CompilerConfig::default(), "main");
        let ns = session.root_namespace();
        let decl = ClassDeclaration {
            name: "Point".to_string(),
            base: None,
            interfaces: Vec::new(),
            fields: vec![FieldDeclaration { name: "x".to_string(), ty: session.types.number, is_static: false, is_vtable_resident: false }],
            is_abstract: false,
            has_rtti: false,
        };

        let layout = declare_and_layout_class(&mut session, ns, decl);
        assert!(layout.vtable.is_empty());
        assert!(layout.rtti_plan.is_none());
    }

    #[test]
    fn a_derived_class_layout_prefixes_the_base_storage_tuple() {
        let mut session = CompilationSession::new(CompilerConfig::default(), "main");
        let ns = session.root_namespace();

        let base_decl = ClassDeclaration {
            name: "Base".to_string(),
            base: None,
            interfaces: Vec::new(),
            fields: vec![FieldDeclaration { name: "f".to_string(), ty: session.types.number, is_static: false, is_vtable_resident: false }],
            is_abstract: false,
            has_rtti: true,
        };
        let base_layout = declare_and_layout_class(&mut session, ns, base_decl);

        let derived_decl = ClassDeclaration {
            name: "Derived".to_string(),
            base: Some(base_layout.class),
            interfaces: Vec::new(),
            fields: vec![FieldDeclaration { name: "g".to_string(), ty: session.types.number, is_static: false, is_vtable_resident: false }],
            is_abstract: false,
            has_rtti: true,
        };
        let derived_layout = declare_and_layout_class(&mut session, ns, derived_decl);

        let flattened = ecmair_sem::layout::flatten_fields(&session.classes, derived_layout.class);
        assert_eq!(flattened.len(), 2);
        assert_eq!(flattened[0].name, session.interner.intern("f"));
        assert_eq!(flattened[1].name, session.interner.intern("g"));
        assert!(derived_layout.rtti_plan.unwrap().super_instance_of.is_some());
    }

    #[test]
    fn finishing_a_session_with_buffered_errors_returns_them_instead_of_a_module() {
        let mut session = CompilationSession::new(CompilerConfig::default(), "main");
        session.diagnostics.report(Diagnostic::error(
            ecmair_common::diagnostics::DiagnosticKind::UnresolvedSymbol,
            ecmair_common::span::Span::at(0),
            "boom",
        ));
        let result = finish(session, Vec::new());
        assert!(result.is_err());
    }
}
