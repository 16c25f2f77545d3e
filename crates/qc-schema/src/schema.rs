use crate::aux::{Annotation, Cast, Constraint, Function, Index, Operator};
use crate::error::{SchemaError, SchemaResult};
use crate::id::{IdAllocator, ObjectId};
use crate::object::{SchemaObject, SchemaObjectBase};
use crate::pointer::Pointer;
use crate::types::{ObjectType, ScalarType, Type};
use qc_ir::name::Name;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

///
/// Referrer
///
/// One edge discovered by [`Schema::referrers_of`]: `referrer` references
/// the queried object through field `via`.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Referrer {
    pub referrer: ObjectId,
    pub via: String,
}

///
/// DeleteOutcome
///
/// The result of [`Schema::check_delete`]: either the object genuinely has
/// no referrers and may be deleted, or it does but the command was declared
/// `if_unused`, in which case the delete is skipped rather than failing.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DeleteOutcome {
    Deleted,
    SkippedStillInUse,
}

///
/// Schema
///
/// A persistent, immutable value. Every field is stored
/// behind an `Arc` so that cloning the whole `Schema` (as happens whenever a
/// delta wants to produce a new snapshot) is O(1), and mutating one map via
/// `Arc::make_mut` only deep-clones that map if another snapshot still holds
/// a reference to it, the structural sharing this design asks for.
///

#[derive(Clone, Debug, Default)]
pub struct Schema {
    scalars: Arc<BTreeMap<ObjectId, ScalarType>>,
    objects: Arc<BTreeMap<ObjectId, ObjectType>>,
    pointers: Arc<BTreeMap<ObjectId, Pointer>>,
    constraints: Arc<BTreeMap<ObjectId, Constraint>>,
    indexes: Arc<BTreeMap<ObjectId, Index>>,
    functions: Arc<BTreeMap<ObjectId, Function>>,
    operators: Arc<BTreeMap<ObjectId, Operator>>,
    casts: Arc<BTreeMap<ObjectId, Cast>>,
    annotations: Arc<BTreeMap<ObjectId, Annotation>>,
    names: Arc<BTreeMap<Name, ObjectId>>,
    module_aliases: Arc<BTreeMap<String, String>>,
    pub id_alloc: Arc<IdAllocator>,
}

impl Schema {
    #[must_use]
    pub fn new(session_salt: u64) -> Self {
        Self {
            id_alloc: Arc::new(IdAllocator::new(session_salt)),
            ..Default::default()
        }
    }

    // ---- registration (used while building a snapshot) ----

    pub fn add_scalar(&mut self, scalar: ScalarType) {
        self.names_mut().insert(scalar.name().clone(), scalar.id());
        self.scalars_mut().insert(scalar.id(), scalar);
    }

    pub fn add_object(&mut self, object: ObjectType) {
        self.names_mut().insert(object.name().clone(), object.id());
        self.objects_mut().insert(object.id(), object);
    }

    pub fn add_pointer(&mut self, pointer: Pointer) {
        self.names_mut()
            .insert(pointer.name().clone(), pointer.id());
        self.pointers_mut().insert(pointer.id(), pointer);
    }

    pub fn add_constraint(&mut self, c: Constraint) {
        self.constraints_mut().insert(c.id(), c);
    }

    pub fn add_index(&mut self, i: Index) {
        self.indexes_mut().insert(i.id(), i);
    }

    pub fn add_function(&mut self, f: Function) {
        self.functions_mut().insert(f.id(), f);
    }

    pub fn add_operator(&mut self, o: Operator) {
        self.operators_mut().insert(o.id(), o);
    }

    pub fn add_cast(&mut self, c: Cast) {
        self.casts_mut().insert(c.id(), c);
    }

    pub fn add_annotation(&mut self, a: Annotation) {
        self.annotations_mut().insert(a.id(), a);
    }

    pub fn add_module_alias(&mut self, alias: impl Into<String>, real: impl Into<String>) {
        Arc::make_mut(&mut self.module_aliases).insert(alias.into(), real.into());
    }

    pub fn remove_object(&mut self, id: ObjectId) {
        if let Some(obj) = self.objects_mut().remove(&id) {
            self.names_mut().remove(obj.name());
        }
    }

    pub fn remove_scalar(&mut self, id: ObjectId) {
        if let Some(s) = self.scalars_mut().remove(&id) {
            self.names_mut().remove(s.name());
        }
    }

    pub fn remove_pointer(&mut self, id: ObjectId) {
        if let Some(p) = self.pointers_mut().remove(&id) {
            self.names_mut().remove(p.name());
        }
    }

    pub fn remove_constraint(&mut self, id: ObjectId) {
        self.constraints_mut().remove(&id);
    }

    pub fn remove_index(&mut self, id: ObjectId) {
        self.indexes_mut().remove(&id);
    }

    // ---- lookup ----

    #[must_use]
    pub fn get_scalar(&self, id: ObjectId) -> Option<&ScalarType> {
        self.scalars.get(&id)
    }

    #[must_use]
    pub fn get_object(&self, id: ObjectId) -> Option<&ObjectType> {
        self.objects.get(&id)
    }

    #[must_use]
    pub fn get_pointer(&self, id: ObjectId) -> Option<&Pointer> {
        self.pointers.get(&id)
    }

    #[must_use]
    pub fn get_constraint(&self, id: ObjectId) -> Option<&Constraint> {
        self.constraints.get(&id)
    }

    #[must_use]
    pub fn get_index(&self, id: ObjectId) -> Option<&Index> {
        self.indexes.get(&id)
    }

    #[must_use]
    pub fn get_function(&self, id: ObjectId) -> Option<&Function> {
        self.functions.get(&id)
    }

    #[must_use]
    pub fn objects(&self) -> impl Iterator<Item = &ObjectType> {
        self.objects.values()
    }

    #[must_use]
    pub fn scalars(&self) -> impl Iterator<Item = &ScalarType> {
        self.scalars.values()
    }

    #[must_use]
    pub fn pointers_of(&self, source: ObjectId) -> impl Iterator<Item = &Pointer> {
        self.pointers.values().filter(move |p| p.source == source)
    }

    /// Resolve a name to an object id, applying module aliasing first.
    pub fn resolve_name(&self, name: &Name) -> SchemaResult<ObjectId> {
        let resolved = self.apply_module_alias(name);
        self.names
            .get(&resolved)
            .copied()
            .ok_or_else(|| SchemaError::UnknownName(name.clone()))
    }

    fn apply_module_alias(&self, name: &Name) -> Name {
        match name {
            Name::Qualified(module, local) => {
                match self.module_aliases.get(module.as_str()) {
                    Some(real) => Name::qualified(real.clone(), local.clone()),
                    None => name.clone(),
                }
            }
            Name::Simple(_) => name.clone(),
        }
    }

    // ---- ancestry ----

    fn base_of(&self, id: ObjectId) -> Option<&SchemaObjectBase> {
        if let Some(o) = self.objects.get(&id) {
            return Some(&o.base);
        }
        if let Some(s) = self.scalars.get(&id) {
            return Some(&s.base);
        }
        if let Some(p) = self.pointers.get(&id) {
            return Some(&p.base);
        }
        None
    }

    #[must_use]
    pub fn ancestor_set(&self, id: ObjectId) -> BTreeSet<ObjectId> {
        self.base_of(id)
            .map(|b| b.ancestors.iter().copied().collect())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn is_subclass_of(&self, id: ObjectId, other: ObjectId) -> bool {
        self.base_of(id)
            .is_some_and(|b| b.is_subclass_of(other))
    }

    fn is_strict_ancestor(&self, candidate: ObjectId, of: ObjectId) -> bool {
        candidate != of && self.is_subclass_of(of, candidate)
    }

    /// Nearest-common-ancestor: the maximal types `A` such that every
    /// input is a subclass of `A`, tie-broken deterministically by creation
    /// id when more than one is maximal.
    pub fn nearest_common_ancestor(&self, types: &[ObjectId]) -> SchemaResult<ObjectId> {
        let mut iter = types.iter();
        let first = iter.next().ok_or(SchemaError::NoCommonAncestor)?;
        let mut common = self.ancestor_set(*first);
        for &t in iter {
            let anc = self.ancestor_set(t);
            common = common.intersection(&anc).copied().collect();
        }
        if common.is_empty() {
            return Err(SchemaError::NoCommonAncestor);
        }

        let maximal: Vec<ObjectId> = common
            .iter()
            .copied()
            .filter(|&c| !common.iter().any(|&d| self.is_strict_ancestor(c, d)))
            .collect();

        maximal
            .into_iter()
            .min_by_key(|&id| IdAllocator::creation_order(id))
            .ok_or(SchemaError::NoCommonAncestor)
    }

    /// The first non-abstract ancestor of `id`, walking up from most
    /// specific to least. Used by the scalar-enum rewrite-through-ancestor
    /// path; callers needing the enum special
    /// case (substitute the root string scalar rather than walking
    /// ancestors) should check `ScalarType::is_enum` first, per
    /// original_source/edb/pgsql/delta.py's `_get_problematic_refs`.
    #[must_use]
    pub fn first_concrete_ancestor_object(&self, id: ObjectId) -> Option<ObjectId> {
        self.get_object(id)?
            .base
            .ancestors
            .iter()
            .rev()
            .find(|&&anc| self.get_object(anc).is_some_and(|o| !o.is_abstract()))
            .copied()
    }

    // ---- referrers & referential integrity ----

    #[must_use]
    pub fn referrers_of(&self, target: ObjectId) -> Vec<Referrer> {
        let mut out = Vec::new();

        for ptr in self.pointers.values() {
            if type_references(&ptr.target, target) {
                out.push(Referrer {
                    referrer: ptr.source,
                    via: ptr.name().to_string(),
                });
            }
        }

        for obj in self.objects.values() {
            let members: &[ObjectId] = match &obj.kind {
                crate::types::ObjectTypeKind::Union(m)
                | crate::types::ObjectTypeKind::Intersection(m) => m,
                _ => &[],
            };
            if members.contains(&target) {
                out.push(Referrer {
                    referrer: obj.id(),
                    via: "compound type member".to_string(),
                });
            }
        }

        out
    }

    /// Check whether `target` may be deleted. A Delete fails
    /// unless all referrers are already removed, unless the command was
    /// declared `if_unused`, in which case a still-referenced object is
    /// simply skipped rather than erroring.
    pub fn check_delete(&self, target: ObjectId, if_unused: bool) -> SchemaResult<DeleteOutcome> {
        let referrers = self.referrers_of(target);
        if referrers.is_empty() {
            return Ok(DeleteOutcome::Deleted);
        }
        if if_unused {
            return Ok(DeleteOutcome::SkippedStillInUse);
        }
        let name = self
            .base_of(target)
            .map(|b| b.name.clone())
            .unwrap_or_else(|| Name::simple("<unknown>"));
        let first = &referrers[0];
        let referrer_name = self
            .base_of(first.referrer)
            .map(|b| b.name.clone())
            .unwrap_or_else(|| Name::simple("<unknown>"));
        Err(SchemaError::ReferencedByOthers {
            subject: name,
            referrer: referrer_name,
            via: first.via.clone(),
        })
    }

    // ---- Arc::make_mut helpers (copy-on-write) ----

    fn scalars_mut(&mut self) -> &mut BTreeMap<ObjectId, ScalarType> {
        Arc::make_mut(&mut self.scalars)
    }
    fn objects_mut(&mut self) -> &mut BTreeMap<ObjectId, ObjectType> {
        Arc::make_mut(&mut self.objects)
    }
    fn pointers_mut(&mut self) -> &mut BTreeMap<ObjectId, Pointer> {
        Arc::make_mut(&mut self.pointers)
    }
    fn constraints_mut(&mut self) -> &mut BTreeMap<ObjectId, Constraint> {
        Arc::make_mut(&mut self.constraints)
    }
    fn indexes_mut(&mut self) -> &mut BTreeMap<ObjectId, Index> {
        Arc::make_mut(&mut self.indexes)
    }
    fn functions_mut(&mut self) -> &mut BTreeMap<ObjectId, Function> {
        Arc::make_mut(&mut self.functions)
    }
    fn operators_mut(&mut self) -> &mut BTreeMap<ObjectId, Operator> {
        Arc::make_mut(&mut self.operators)
    }
    fn casts_mut(&mut self) -> &mut BTreeMap<ObjectId, Cast> {
        Arc::make_mut(&mut self.casts)
    }
    fn annotations_mut(&mut self) -> &mut BTreeMap<ObjectId, Annotation> {
        Arc::make_mut(&mut self.annotations)
    }
    fn names_mut(&mut self) -> &mut BTreeMap<Name, ObjectId> {
        Arc::make_mut(&mut self.names)
    }
}

fn type_references(ty: &Type, target: ObjectId) -> bool {
    match ty {
        Type::Object(id) | Type::Scalar(id) => *id == target,
        Type::Pseudo(_) => false,
        Type::Collection(c) => match c {
            crate::types::CollectionType::Array(inner) => type_references(inner, target),
            crate::types::CollectionType::Tuple(elems) => {
                elems.iter().any(|t| type_references(t, target))
            }
            crate::types::CollectionType::NamedTuple(elems) => {
                elems.iter().any(|(_, t)| type_references(t, target))
            }
        },
    }
}
