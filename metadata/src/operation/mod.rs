// SPDX-FileCopyrightText: Copyright (c) 2025 the odata-svc authors. All rights reserved.
// SPDX-License-Identifier: Apache-2.0
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
// http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Callable operations: query-style service operations and
//! side-effecting service actions.

/// Operation parameters.
pub mod parameter;

/// Result-set path expressions.
pub mod path_expression;

/// Registration-time operation wrapper.
pub mod wrapper;

use crate::error::Error;
use crate::ident::SimpleIdentifier;
use crate::resource::ResourceSet;
use crate::resource::ResourceType;
use crate::resource::ResourceTypeKind;
use std::fmt::Debug;
use std::fmt::Formatter;
use std::fmt::Result as FmtResult;
use std::sync::Arc;

/// Reexport `OperationParameter` to the level of the module.
pub use parameter::OperationParameter;
/// Reexport `ResourceSetPathExpression` to the level of the module.
pub use path_expression::ResourceSetPathExpression;
/// Reexport `PathSegment` to the level of the module.
pub use path_expression::PathSegment;
/// Reexport `OperationWrapper` to the level of the module.
pub use wrapper::OperationWrapper;

/// Flavor of a callable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OperationKind {
    /// Query-style, composable callable.
    ServiceOperation,
    /// Side-effecting callable, optionally bound to an entity.
    ServiceAction,
}

/// Shape of an operation result.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ServiceOperationResultKind {
    /// No result at all.
    Void,
    /// A single value computed directly.
    DirectValue,
    /// A plain sequence of values.
    Enumeration,
    /// A query returning any number of results.
    QueryWithMultipleResults,
    /// A query returning at most one result.
    QueryWithSingleResult,
}

impl ServiceOperationResultKind {
    /// Result kinds whose return type is a collection wrapper over
    /// the supplied item type.
    #[must_use]
    pub fn is_multiple(self) -> bool {
        matches!(self, Self::Enumeration | Self::QueryWithMultipleResults)
    }
}

/// Whether an operation takes a binding parameter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OperationParameterBindingKind {
    /// Never bound; all parameters are plain inputs.
    Never,
    /// Bindable; the first parameter binds when invoked bound.
    Sometimes,
    /// Only callable bound to the first parameter.
    Always,
}

/// A named, parameterized callable with a computed or fixed result
/// set.
pub struct Operation {
    name: SimpleIdentifier,
    kind: OperationKind,
    result_kind: ServiceOperationResultKind,
    result_type: Option<Arc<ResourceType>>,
    return_type: Option<Arc<ResourceType>>,
    parameters: Vec<Arc<OperationParameter>>,
    binding_kind: OperationParameterBindingKind,
    result_set: Option<Arc<ResourceSet>>,
    path_expression: Option<ResourceSetPathExpression>,
}

impl Operation {
    /// Declare a query-style service operation. Service operations
    /// are never bound, take primitive parameters only, and resolve
    /// entity results against a fixed result set.
    ///
    /// # Errors
    ///
    /// Returns an error when the result kind and result type
    /// disagree, the result type is a collection wrapper, a
    /// parameter is not primitive, or an entity result lacks its
    /// result set.
    pub fn service_operation(
        name: &str,
        result_kind: ServiceOperationResultKind,
        result_type: Option<Arc<ResourceType>>,
        parameters: Vec<Arc<OperationParameter>>,
        result_set: Option<Arc<ResourceSet>>,
    ) -> Result<Arc<Self>, Error> {
        let name: SimpleIdentifier = name.parse()?;
        for parameter in &parameters {
            if parameter.parameter_type().kind() != ResourceTypeKind::Primitive {
                return Err(Error::ParameterNotPrimitive(
                    parameter.name().inner().clone(),
                ));
            }
        }
        let return_type =
            Self::validate_result(&name, result_kind, &result_type, &result_set, &None)?;
        Ok(Arc::new(Self {
            name,
            kind: OperationKind::ServiceOperation,
            result_kind,
            result_type,
            return_type,
            parameters,
            binding_kind: OperationParameterBindingKind::Never,
            result_set,
            path_expression: None,
        }))
    }

    /// Declare a service action. When the first parameter is entity
    /// typed the action is bindable to it, and an entity result may
    /// name its set either directly or through a path expression
    /// rooted at that parameter.
    ///
    /// # Errors
    ///
    /// Returns an error under the same result rules as service
    /// operations, when both a result set and a path expression are
    /// supplied, or when a path expression is supplied without an
    /// entity binding parameter.
    pub fn service_action(
        name: &str,
        result_kind: ServiceOperationResultKind,
        result_type: Option<Arc<ResourceType>>,
        parameters: Vec<Arc<OperationParameter>>,
        result_set: Option<Arc<ResourceSet>>,
        path_expression: Option<ResourceSetPathExpression>,
    ) -> Result<Arc<Self>, Error> {
        let name: SimpleIdentifier = name.parse()?;
        let binding = parameters
            .first()
            .filter(|p| p.binding_entity_type().is_some());
        let binding_kind = match binding {
            Some(_) => OperationParameterBindingKind::Sometimes,
            None => OperationParameterBindingKind::Never,
        };
        if let Some(path) = &path_expression {
            let binding = binding
                .ok_or_else(|| Error::BindingParameterNotEntity(name.inner().clone()))?;
            path.set_binding_parameter(binding.clone())?;
        }
        let return_type = Self::validate_result(
            &name,
            result_kind,
            &result_type,
            &result_set,
            &path_expression,
        )?;
        Ok(Arc::new(Self {
            name,
            kind: OperationKind::ServiceAction,
            result_kind,
            result_type,
            return_type,
            parameters,
            binding_kind,
            result_set,
            path_expression,
        }))
    }

    fn validate_result(
        name: &SimpleIdentifier,
        result_kind: ServiceOperationResultKind,
        result_type: &Option<Arc<ResourceType>>,
        result_set: &Option<Arc<ResourceSet>>,
        path_expression: &Option<ResourceSetPathExpression>,
    ) -> Result<Option<Arc<ResourceType>>, Error> {
        let result_type = match (result_kind, result_type) {
            (ServiceOperationResultKind::Void, None) => {
                if result_set.is_some() || path_expression.is_some() {
                    return Err(Error::OperationUnexpectedResultSet(name.inner().clone()));
                }
                return Ok(None);
            }
            (ServiceOperationResultKind::Void, Some(_)) | (_, None) => {
                return Err(Error::OperationResultMismatch(name.inner().clone()))
            }
            (_, Some(t)) => t,
        };
        if result_type.kind().is_collection() {
            return Err(Error::OperationResultCollection(name.inner().clone()));
        }
        if result_type.kind() == ResourceTypeKind::EntityType {
            match (result_set, path_expression) {
                (Some(_), Some(_)) => {
                    return Err(Error::OperationResultSetConflict(name.inner().clone()))
                }
                (None, None) => {
                    return Err(Error::OperationMissingResultSet(name.inner().clone()))
                }
                _ => {}
            }
        } else if result_set.is_some() || path_expression.is_some() {
            return Err(Error::OperationUnexpectedResultSet(name.inner().clone()));
        }
        let return_type = if result_kind.is_multiple() {
            if result_type.kind() == ResourceTypeKind::EntityType {
                ResourceType::entity_collection(result_type.clone())?
            } else {
                ResourceType::collection(result_type.clone())?
            }
        } else {
            result_type.clone()
        };
        Ok(Some(return_type))
    }

    #[must_use]
    pub const fn name(&self) -> &SimpleIdentifier {
        &self.name
    }

    #[must_use]
    pub const fn kind(&self) -> OperationKind {
        self.kind
    }

    #[must_use]
    pub const fn result_kind(&self) -> ServiceOperationResultKind {
        self.result_kind
    }

    /// The item type the provider supplied, before any collection
    /// wrapping.
    #[must_use]
    pub const fn result_type(&self) -> Option<&Arc<ResourceType>> {
        self.result_type.as_ref()
    }

    /// The synthesized return type: collection-wrapped for multiple
    /// result kinds, the item type otherwise.
    #[must_use]
    pub const fn return_type(&self) -> Option<&Arc<ResourceType>> {
        self.return_type.as_ref()
    }

    #[must_use]
    pub fn parameters(&self) -> &[Arc<OperationParameter>] {
        &self.parameters
    }

    #[must_use]
    pub const fn binding_kind(&self) -> OperationParameterBindingKind {
        self.binding_kind
    }

    /// The binding parameter of a bindable operation.
    #[must_use]
    pub fn binding_parameter(&self) -> Option<&Arc<OperationParameter>> {
        match self.binding_kind {
            OperationParameterBindingKind::Never => None,
            _ => self.parameters.first(),
        }
    }

    #[must_use]
    pub const fn result_set(&self) -> Option<&Arc<ResourceSet>> {
        self.result_set.as_ref()
    }

    #[must_use]
    pub const fn path_expression(&self) -> Option<&ResourceSetPathExpression> {
        self.path_expression.as_ref()
    }

    /// Seal the parameters and the synthesized return type together
    /// with the model.
    pub(crate) fn seal(&self) -> Result<(), Error> {
        for parameter in &self.parameters {
            parameter.seal();
        }
        if let Some(t) = &self.return_type {
            t.set_read_only()?;
        }
        Ok(())
    }
}

impl Debug for Operation {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{:?} {}", self.kind, self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::primitive;
    use crate::resource::InstanceTypeDescriptor;
    use crate::resource::IsAbstract;
    use crate::resource::IsOpenType;
    use crate::resource::PrimitiveKind;
    use crate::resource::PropertyTypeRef;
    use crate::resource::ResourceProperty;
    use crate::resource::ResourcePropertyKind;
    use crate::resource::ResourceSet;

    fn customer() -> Arc<ResourceType> {
        let t = ResourceType::entity(
            "Customer",
            "Test.Model",
            InstanceTypeDescriptor::new("Customer".to_string()),
            None,
            IsAbstract::new(false),
            IsOpenType::new(false),
        )
        .unwrap();
        t.add_property(
            ResourceProperty::new(
                "Id",
                ResourcePropertyKind::PRIMITIVE | ResourcePropertyKind::KEY,
                PropertyTypeRef::Inline(primitive::resource_type(PrimitiveKind::Int32)),
            )
            .unwrap(),
        )
        .unwrap();
        t
    }

    #[test]
    fn void_means_no_result_type() {
        let err = Operation::service_operation(
            "GetNothing",
            ServiceOperationResultKind::Void,
            Some(primitive::resource_type(PrimitiveKind::Int32)),
            Vec::new(),
            None,
        )
        .expect_err("void with a result type");
        assert!(matches!(err, Error::OperationResultMismatch(_)));

        let err = Operation::service_operation(
            "GetSomething",
            ServiceOperationResultKind::DirectValue,
            None,
            Vec::new(),
            None,
        )
        .expect_err("typed kind without a result type");
        assert!(matches!(err, Error::OperationResultMismatch(_)));
    }

    #[test]
    fn collection_results_must_be_supplied_as_items() {
        let strings =
            ResourceType::collection(primitive::resource_type(PrimitiveKind::String)).unwrap();
        let err = Operation::service_operation(
            "GetNames",
            ServiceOperationResultKind::Enumeration,
            Some(strings),
            Vec::new(),
            None,
        )
        .expect_err("collection wrapper supplied directly");
        assert!(matches!(err, Error::OperationResultCollection(_)));
    }

    #[test]
    fn multiple_results_synthesize_a_collection_return_type() {
        let op = Operation::service_operation(
            "GetNames",
            ServiceOperationResultKind::Enumeration,
            Some(primitive::resource_type(PrimitiveKind::String)),
            Vec::new(),
            None,
        )
        .unwrap();
        let rt = op.return_type().unwrap();
        assert_eq!(rt.kind(), ResourceTypeKind::Collection);
        assert_eq!(rt.full_name(), "Collection(Edm.String)");

        let set = ResourceSet::new("Customers", customer()).unwrap();
        let op = Operation::service_operation(
            "GetCustomers",
            ServiceOperationResultKind::QueryWithMultipleResults,
            Some(set.resource_type().clone()),
            Vec::new(),
            Some(set),
        )
        .unwrap();
        assert_eq!(
            op.return_type().unwrap().kind(),
            ResourceTypeKind::EntityCollection
        );
    }

    #[test]
    fn entity_results_need_exactly_one_result_source() {
        let set = ResourceSet::new("Customers", customer()).unwrap();
        let entity = set.resource_type().clone();
        let err = Operation::service_action(
            "Promote",
            ServiceOperationResultKind::DirectValue,
            Some(entity.clone()),
            Vec::new(),
            None,
            None,
        )
        .expect_err("entity result without a set");
        assert!(matches!(err, Error::OperationMissingResultSet(_)));

        let binding = OperationParameter::new("customer", entity.clone()).unwrap();
        let path = ResourceSetPathExpression::new("customer").unwrap();
        let err = Operation::service_action(
            "Promote",
            ServiceOperationResultKind::DirectValue,
            Some(entity),
            vec![binding],
            Some(set),
            Some(path),
        )
        .expect_err("both result sources");
        assert!(matches!(err, Error::OperationResultSetConflict(_)));
    }

    #[test]
    fn path_expressions_require_an_entity_binding_parameter() {
        let set = ResourceSet::new("Customers", customer()).unwrap();
        let entity = set.resource_type().clone();
        let amount =
            OperationParameter::new("amount", primitive::resource_type(PrimitiveKind::Int32))
                .unwrap();
        let path = ResourceSetPathExpression::new("amount").unwrap();
        let err = Operation::service_action(
            "Promote",
            ServiceOperationResultKind::DirectValue,
            Some(entity),
            vec![amount],
            None,
            Some(path),
        )
        .expect_err("primitive binding parameter");
        assert!(matches!(err, Error::BindingParameterNotEntity(_)));
    }

    #[test]
    fn bound_actions_report_their_binding_parameter() {
        let entity = customer();
        let binding = OperationParameter::new("customer", entity.clone()).unwrap();
        let op = Operation::service_action(
            "Touch",
            ServiceOperationResultKind::Void,
            None,
            vec![binding],
            None,
            None,
        )
        .unwrap();
        assert_eq!(
            op.binding_kind(),
            OperationParameterBindingKind::Sometimes
        );
        assert_eq!(op.binding_parameter().unwrap().name().inner(), "customer");
    }

    #[test]
    fn service_operations_take_primitive_parameters_only() {
        let entity = customer();
        let param = OperationParameter::new("who", entity).unwrap();
        let err = Operation::service_operation(
            "Lookup",
            ServiceOperationResultKind::Void,
            None,
            vec![param],
            None,
        )
        .expect_err("entity parameter on a service operation");
        assert!(matches!(err, Error::ParameterNotPrimitive(_)));
    }
}
