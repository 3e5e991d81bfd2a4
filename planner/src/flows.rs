//! Reusable plan flows.
//!
//! Each flow appends its steps to a `PlanBuilder` in dependency order:
//! containers before the lists that reference them, references detached
//! before the documents they point to are deleted.

use mend_access::{AccessDescriptor, DescriptorLayout, RoleTier};
use mend_core::{DocumentRef, Fields, Value};
use mend_mutation::{FieldExpr, Payload};
use mend_store::DocumentStore;

use crate::builder::{PlanBuilder, StepHandle};
use crate::error::BuildResult;

/// A list field in some collection that may hold a document's id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParentLink<'a> {
    pub collection: &'a str,
    pub field: &'a str,
}

impl<'a> ParentLink<'a> {
    pub fn new(collection: &'a str, field: &'a str) -> Self {
        Self { collection, field }
    }
}

/// A collection whose documents point at a parent through a scalar field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChildLink<'a> {
    pub collection: &'a str,
    pub field: &'a str,
}

impl<'a> ChildLink<'a> {
    pub fn new(collection: &'a str, field: &'a str) -> Self {
        Self { collection, field }
    }
}

/// Create a document and append its id to `owner`'s list `list_field`.
pub fn create_linked<S: DocumentStore + ?Sized>(
    builder: &mut PlanBuilder<'_, S>,
    collection: &str,
    data: Payload,
    owner: &DocumentRef,
    list_field: &str,
) -> BuildResult<StepHandle> {
    // Owner must exist before anything is planned.
    builder.load(owner)?;
    let handle = builder.create(collection, data)?;
    builder.append_to_list(owner, list_field, handle.id())?;
    Ok(handle)
}

/// Remove `child`'s id from every parent list naming it, then delete `child`.
pub fn detach_and_delete<S: DocumentStore + ?Sized>(
    builder: &mut PlanBuilder<'_, S>,
    child: &DocumentRef,
    parents: &[ParentLink<'_>],
) -> BuildResult<()> {
    builder.load(child)?;
    let id = Value::from(child.id.as_str());
    for link in parents {
        for parent in builder.find_containing(link.collection, link.field, &id)? {
            builder.remove_from_list(&parent, link.field, &id)?;
        }
    }
    builder.delete(child)
}

/// Delete `parent` together with its dependents.
///
/// Order: detach `parent` from every list naming it, delete each child
/// found through `children`, then delete `parent`.
pub fn cascade_delete<S: DocumentStore + ?Sized>(
    builder: &mut PlanBuilder<'_, S>,
    parent: &DocumentRef,
    parents: &[ParentLink<'_>],
    children: &[ChildLink<'_>],
) -> BuildResult<()> {
    builder.load(parent)?;
    let id = Value::from(parent.id.as_str());
    for link in parents {
        for holder in builder.find_containing(link.collection, link.field, &id)? {
            builder.remove_from_list(&holder, link.field, &id)?;
        }
    }
    for link in children {
        for child in builder.find_by_field(link.collection, link.field, &id)? {
            builder.delete(&child)?;
        }
    }
    builder.delete(parent)
}

/// Grant `collaborator` a tier on a shared resource.
#[derive(Debug, Clone)]
pub struct ShareRequest<'a, R: RoleTier> {
    pub resource: &'a DocumentRef,
    pub layout: &'a DescriptorLayout,
    /// Actor performing the share.
    pub actor: &'a str,
    /// Tier the actor needs to share.
    pub required: R,
    /// Collaborator's user document.
    pub collaborator: &'a DocumentRef,
    pub tier: R,
    /// List on the collaborator's document that records shared resources.
    pub collaborator_list: &'a str,
    /// Key of the resource id inside a collaborator list entry.
    pub entry_id_field: &'a str,
}

/// Add the collaborator to the resource's tier list and record the resource
/// with its role code on the collaborator's own list.
pub fn share<S: DocumentStore + ?Sized, R: RoleTier>(
    builder: &mut PlanBuilder<'_, S>,
    request: &ShareRequest<'_, R>,
) -> BuildResult<()> {
    let resource = builder.load(request.resource)?;
    let descriptor = AccessDescriptor::<R>::from_document(&resource, request.layout);
    builder.require_access(&descriptor, request.actor, request.required)?;
    builder.load(request.collaborator)?;

    let member = Value::from(request.collaborator.id.as_str());
    let already_listed = resource
        .get(request.tier.list_field())
        .is_some_and(|list| list.list_contains(&member));
    if !already_listed {
        builder.append_to_list(
            request.resource,
            request.tier.list_field(),
            FieldExpr::Value(member),
        )?;
    }

    let mut entry = Fields::new();
    entry.insert(
        request.entry_id_field.to_string(),
        Value::from(request.resource.id.as_str()),
    );
    entry.insert("role".to_string(), Value::Int(request.tier.code()));
    builder.append_to_list(
        request.collaborator,
        request.collaborator_list,
        FieldExpr::Value(Value::Map(entry)),
    )
}
