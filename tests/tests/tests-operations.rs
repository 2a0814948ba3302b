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

use odata_svc_metadata::cache::SelectedOperationsCache;
use odata_svc_metadata::operation::Operation;
use odata_svc_metadata::operation::OperationParameter;
use odata_svc_metadata::operation::ResourceSetPathExpression;
use odata_svc_metadata::operation::ServiceOperationResultKind;
use odata_svc_metadata::resource::UseMetadataKeyOrder;
use odata_svc_metadata::Error;
use odata_svc_tests::base;
use std::sync::Arc;

#[test]
fn path_expression_compiles_to_two_segments() {
    let fixture = base::build();
    let wrapper = fixture
        .model
        .try_resolve_bound_operation("GetDetails", &fixture.customer)
        .expect("bound action registered");
    let path = wrapper
        .operation()
        .path_expression()
        .expect("action uses a path expression");
    assert!(path.is_compiled());
    assert_eq!(path.segment_count(), Some(2));
    assert_eq!(
        path.binding_parameter().unwrap().name().inner(),
        "customer"
    );
}

#[test]
fn path_must_start_with_the_binding_parameter_name() {
    let fixture = base::build_unfinalized();
    let err = Operation::service_action(
        "Misbound",
        ServiceOperationResultKind::QueryWithMultipleResults,
        Some(fixture.order_detail.clone()),
        vec![OperationParameter::new("c", fixture.customer.clone()).unwrap()],
        None,
        Some(ResourceSetPathExpression::new("customer/Orders/OrderDetails").unwrap()),
    )
    .expect_err("binding parameter is named c, path starts with customer");
    assert!(matches!(
        err,
        Error::PathMustStartWithBindingParameter(_, _)
    ));
}

#[test]
fn unresolvable_segments_fail_at_finalize() {
    let fixture = base::build_unfinalized();
    let op = Operation::service_action(
        "Dangling",
        ServiceOperationResultKind::QueryWithMultipleResults,
        Some(fixture.order_detail.clone()),
        vec![OperationParameter::new("customer", fixture.customer.clone()).unwrap()],
        None,
        Some(ResourceSetPathExpression::new("customer/Nope").unwrap()),
    )
    .unwrap();
    fixture.model.add_service_operation(op).unwrap();
    let err = fixture
        .model
        .finalize(Vec::new(), UseMetadataKeyOrder::new(false))
        .expect_err("unresolvable segment");
    match err {
        Error::Operation(name, inner) => {
            assert_eq!(name, "Dangling");
            assert!(matches!(*inner, Error::PathUnresolvedSegment(_)));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn cast_segments_refine_but_may_not_end_the_path() {
    let fixture = base::build_unfinalized();
    let cast_ok = Operation::service_action(
        "DetailsOfPreferred",
        ServiceOperationResultKind::QueryWithMultipleResults,
        Some(fixture.order_detail.clone()),
        vec![OperationParameter::new("customer", fixture.customer.clone()).unwrap()],
        None,
        Some(
            ResourceSetPathExpression::new(
                "customer/Northwind.Model.PreferredCustomer/Orders/OrderDetails",
            )
            .unwrap(),
        ),
    )
    .unwrap();
    let cast_last = Operation::service_action(
        "CastOnly",
        ServiceOperationResultKind::QueryWithMultipleResults,
        Some(fixture.customer.clone()),
        vec![OperationParameter::new("customer", fixture.customer.clone()).unwrap()],
        None,
        Some(
            ResourceSetPathExpression::new("customer/Northwind.Model.PreferredCustomer").unwrap(),
        ),
    )
    .unwrap();
    fixture.model.add_service_operation(cast_ok.clone()).unwrap();
    fixture.model.add_service_operation(cast_last).unwrap();

    let err = fixture
        .model
        .finalize(Vec::new(), UseMetadataKeyOrder::new(false))
        .expect_err("trailing cast must fail");
    match err {
        Error::Operation(name, inner) => {
            assert_eq!(name, "CastOnly");
            assert!(matches!(*inner, Error::PathCastMayNotBeLast(_)));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn target_set_resolution_walks_the_association_graph() {
    let fixture = base::build();
    let wrapper = fixture
        .model
        .try_resolve_bound_operation("GetDetails", &fixture.customer)
        .unwrap();
    let target = wrapper
        .get_result_set(fixture.model.as_ref(), Some(&fixture.customers))
        .expect("path resolves through Customers -> Orders -> OrderDetails");
    assert!(Arc::ptr_eq(&target, &fixture.order_details));
}

#[test]
fn fixed_result_sets_resolve_without_a_binding_set() {
    let fixture = base::build();
    let wrapper = fixture
        .model
        .try_resolve_service_operation("GetCustomerByName")
        .expect("unbound operation resolves by bare name");
    let target = wrapper.get_result_set(fixture.model.as_ref(), None).unwrap();
    assert!(Arc::ptr_eq(&target, &fixture.customers));
    assert_eq!(
        wrapper.operation().return_type().unwrap().full_name(),
        "Northwind.Model.Customer"
    );
}

#[test]
fn duplicate_operation_keys_fail_at_registration() {
    let fixture = base::build_unfinalized();
    let duplicate = Operation::service_action(
        "Touch",
        ServiceOperationResultKind::Void,
        None,
        vec![OperationParameter::new("customer", fixture.customer.clone()).unwrap()],
        None,
        None,
    )
    .unwrap();
    assert!(matches!(
        fixture.model.add_service_operation(duplicate),
        Err(Error::DuplicateOperation(_))
    ));
}

#[test]
fn selected_operations_respect_polymorphic_binding() {
    let fixture = base::build();
    let touch = fixture
        .model
        .try_resolve_bound_operation("Touch", &fixture.customer)
        .unwrap();
    let cache = SelectedOperationsCache::new();
    cache.add_selected_operations(&fixture.customer, &[touch.clone()]);

    // Selected at the base level, still bindable to the derived type.
    let for_preferred = cache.get_selected_operations(&fixture.preferred_customer);
    assert_eq!(for_preferred.len(), 1);
    assert!(Arc::ptr_eq(&for_preferred[0], &touch));

    // And memoized per instance type.
    let again = cache.get_selected_operations(&fixture.preferred_customer);
    assert!(Arc::ptr_eq(&again, &for_preferred));
}
