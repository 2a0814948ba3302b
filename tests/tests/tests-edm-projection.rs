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

use odata_svc_edm::EdmEntitySetReference;
use odata_svc_edm::EdmModel;
use odata_svc_edm::EdmModelMode;
use odata_svc_edm::EdmTypeKind;
use odata_svc_edm::Error as EdmError;
use odata_svc_metadata::association::Multiplicity;
use odata_svc_tests::base;
use std::sync::Arc;

fn serialization_model() -> (base::Northwind, EdmModel) {
    let fixture = base::build();
    let edm = EdmModel::new(fixture.model.clone(), EdmModelMode::Serialization);
    (fixture, edm)
}

#[test]
fn projected_elements_are_identity_stable() {
    let (fixture, edm) = serialization_model();
    let first = edm.ensure_schema_type(&fixture.customer).unwrap();
    let second = edm.ensure_schema_type(&fixture.customer).unwrap();
    assert!(Arc::ptr_eq(&first, &second));

    let set_a = edm.ensure_entity_set(&fixture.customers).unwrap();
    let set_b = edm.find_entity_set("Customers").unwrap().unwrap();
    assert!(Arc::ptr_eq(&set_a, &set_b));
}

#[test]
fn structural_properties_keep_a_source_back_reference() {
    let (fixture, edm) = serialization_model();
    let customer = edm.ensure_schema_type(&fixture.customer).unwrap();
    let structural = edm.structural_properties(&customer).unwrap();
    let names: Vec<_> = structural
        .iter()
        .map(|p| p.name().inner().clone())
        .collect();
    assert_eq!(names, ["Id", "Name", "HomeAddress"]);

    let source = fixture
        .customer
        .properties()
        .iter()
        .find(|p| p.name().inner() == "Name")
        .unwrap()
        .clone();
    let projected = structural
        .iter()
        .find(|p| p.name().inner() == "Name")
        .unwrap();
    assert!(Arc::ptr_eq(projected.source(), &source));
    assert_eq!(projected.type_reference().to_string(), "Edm.String");

    let address = structural
        .iter()
        .find(|p| p.name().inner() == "HomeAddress")
        .unwrap();
    assert_eq!(
        address.type_reference().to_string(),
        "Northwind.Model.Address"
    );
}

#[test]
fn navigation_partners_pair_both_directions() {
    let (fixture, edm) = serialization_model();
    let customer = edm.ensure_schema_type(&fixture.customer).unwrap();
    let navigation = edm.navigation_properties(&customer).unwrap();
    let orders = navigation
        .iter()
        .find(|n| n.name().inner() == "Orders")
        .expect("Customer.Orders projects");
    assert!(orders.is_collection());
    assert_eq!(orders.multiplicity(), Multiplicity::Many);
    assert_eq!(orders.target_type().to_string(), "Northwind.Model.Order");
    assert_eq!(
        orders.dependent_properties().map(|d| d.len()),
        Some(1),
        "principal end carries the dependent property list"
    );

    let partner = edm
        .navigation_partner(orders)
        .unwrap()
        .expect("fix-up paired the reverse property");
    assert_eq!(partner.name().inner(), "Customer");
    assert_eq!(
        partner.declaring_type().to_string(),
        "Northwind.Model.Order"
    );
    assert_eq!(partner.multiplicity(), Multiplicity::One);
    assert!(partner.dependent_properties().is_none());

    // And the partner of the partner is Customer.Orders again.
    let back = edm.navigation_partner(&partner).unwrap().unwrap();
    assert!(Arc::ptr_eq(&back, orders));
}

#[test]
fn one_directional_associations_get_a_silent_partner() {
    let (fixture, edm) = serialization_model();
    let order = edm.ensure_schema_type(&fixture.order).unwrap();
    let navigation = edm.navigation_properties(&order).unwrap();
    let details = navigation
        .iter()
        .find(|n| n.name().inner() == "OrderDetails")
        .unwrap();

    let partner = edm
        .navigation_partner(details)
        .unwrap()
        .expect("silent partner synthesized");
    assert!(partner.is_silent());
    assert!(partner.source().is_none());
    assert_eq!(
        partner.declaring_type().to_string(),
        "Northwind.Model.OrderDetail"
    );
    assert_eq!(partner.target_type().to_string(), "Northwind.Model.Order");

    // The declared side never lists the silent partner.
    let detail_type = edm.ensure_schema_type(&fixture.order_detail).unwrap();
    assert!(edm.navigation_properties(&detail_type).unwrap().is_empty());
}

#[test]
fn full_container_projection_makes_absence_definitive() {
    let (fixture, edm) = serialization_model();
    edm.load_full_container().unwrap();

    let customer = edm
        .find_schema_type("Northwind.Model.Customer")
        .unwrap()
        .expect("projected during the container walk");
    assert_eq!(customer.kind(), EdmTypeKind::Entity);
    assert_eq!(customer.key_names().unwrap().len(), 1);

    let preferred = edm
        .find_schema_type("Northwind.Model.PreferredCustomer")
        .unwrap()
        .unwrap();
    assert_eq!(
        preferred.base_type().unwrap().to_string(),
        "Northwind.Model.Customer"
    );

    let address = edm
        .find_schema_type("Northwind.Model.Address")
        .unwrap()
        .unwrap();
    assert_eq!(address.kind(), EdmTypeKind::Complex);

    assert!(edm.find_schema_type("Northwind.Model.Missing").unwrap().is_none());
    assert!(edm.find_entity_set("Missing").unwrap().is_none());
    assert!(Arc::ptr_eq(&fixture.customer, customer.source()));
}

#[test]
fn operations_project_as_actions_functions_and_imports() {
    let (fixture, edm) = serialization_model();
    edm.load_full_container().unwrap();

    let by_name = fixture
        .model
        .try_resolve_service_operation("GetCustomerByName")
        .unwrap();
    let function = edm.ensure_operation(&by_name).unwrap();
    assert!(function.is_function());
    assert!(!function.is_bound());
    assert_eq!(
        function.return_type().unwrap().to_string(),
        "Northwind.Model.Customer"
    );
    let import = edm.ensure_operation_import(&by_name).unwrap();
    match import.entity_set() {
        EdmEntitySetReference::Named(name) => assert_eq!(name.inner(), "Customers"),
        other => panic!("expected a named set, got {other:?}"),
    }

    let touch = fixture
        .model
        .try_resolve_bound_operation("Touch", &fixture.customer)
        .unwrap();
    let action = edm.ensure_operation(&touch).unwrap();
    assert!(action.is_action());
    assert!(action.is_bound());
    assert!(action.return_type().is_none());

    let get_details = fixture
        .model
        .try_resolve_bound_operation("GetDetails", &fixture.customer)
        .unwrap();
    let import = edm.ensure_operation_import(&get_details).unwrap();
    match import.entity_set() {
        EdmEntitySetReference::Path(segments) => {
            assert_eq!(segments.as_slice(), ["customer", "Orders", "OrderDetails"]);
        }
        other => panic!("expected a raw path, got {other:?}"),
    }
    assert_eq!(
        edm.ensure_operation(&get_details)
            .unwrap()
            .return_type()
            .unwrap()
            .to_string(),
        "Collection(Northwind.Model.OrderDetail)"
    );
}

#[test]
fn serialization_mode_requires_a_finalized_source() {
    let fixture = base::build_unfinalized();
    let edm = EdmModel::new(fixture.model.clone(), EdmModelMode::Serialization);
    assert!(matches!(
        edm.find_schema_type("Northwind.Model.Customer"),
        Err(EdmError::ModelNotFinalized)
    ));
    assert!(matches!(
        edm.load_full_container(),
        Err(EdmError::ModelNotFinalized)
    ));
}

#[test]
fn uri_parsing_mode_resolves_over_an_incremental_source() {
    let fixture = base::build_unfinalized();
    let edm = EdmModel::new(fixture.model.clone(), EdmModelMode::UriPathParsing);

    let shell = edm
        .find_schema_type("Northwind.Model.Customer")
        .unwrap()
        .expect("incremental resolution by name");
    assert_eq!(shell.full_name(), "Northwind.Model.Customer");
    assert!(!shell.properties_loaded());

    // Unknown while incremental: not yet known to exist, not a
    // definitive absence.
    assert!(edm.find_schema_type("Northwind.Model.Later").unwrap().is_none());
    assert!(edm.find_entity_set("Customers").unwrap().is_some());
}
