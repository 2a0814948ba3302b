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

use odata_svc_metadata::association::Multiplicity;
use odata_svc_metadata::association::OnDeleteAction;
use odata_svc_metadata::association::ResourceAssociationSet;
use odata_svc_metadata::association::ResourceAssociationSetEnd;
use odata_svc_metadata::association::ResourceAssociationType;
use odata_svc_metadata::association::ResourceAssociationTypeEnd;
use odata_svc_metadata::association::ResourceReferentialConstraint;
use odata_svc_metadata::resource::primitive;
use odata_svc_metadata::resource::PrimitiveKind;
use odata_svc_metadata::resource::PropertyTypeRef;
use odata_svc_metadata::resource::ResourceProperty;
use odata_svc_metadata::resource::ResourcePropertyKind;
use odata_svc_metadata::resource::ResourceType;
use odata_svc_metadata::resource::UseMetadataKeyOrder;
use odata_svc_metadata::Error;
use odata_svc_tests::base;
use std::sync::Arc;

fn property_of(t: &Arc<ResourceType>, name: &str) -> Arc<ResourceProperty> {
    t.properties()
        .iter()
        .find(|p| p.name().inner() == name)
        .expect("fixture property exists")
        .clone()
}

#[test]
fn association_set_end_lookup_matches_set_type_and_property() {
    let fixture = base::build();
    let orders_property = property_of(&fixture.customer, "Orders");
    let assoc = fixture
        .model
        .get_resource_association_set(&fixture.customers, &fixture.customer, &orders_property)
        .expect("association registered for Customer.Orders");

    let end = assoc
        .get_resource_association_set_end(
            &fixture.customers,
            &fixture.customer,
            Some(&orders_property),
        )
        .expect("matching end");
    assert_eq!(end.resource_set().name().inner(), "Customers");

    let related = assoc
        .get_related_resource_association_set_end(
            &fixture.customers,
            &fixture.customer,
            Some(&orders_property),
        )
        .expect("related end");
    assert_eq!(related.resource_set().name().inner(), "Orders");
    assert_eq!(
        related.resource_property().unwrap().name().inner(),
        "Customer"
    );

    // A triple that matches neither end resolves to nothing.
    assert!(assoc
        .get_resource_association_set_end(&fixture.order_details, &fixture.order_detail, None)
        .is_none());
}

#[test]
fn derived_types_match_through_end_assignability() {
    let fixture = base::build();
    let orders_property = property_of(&fixture.customer, "Orders");
    let assoc = fixture
        .model
        .get_resource_association_set(
            &fixture.customers,
            &fixture.preferred_customer,
            &orders_property,
        )
        .expect("inherited navigation matches via assignability");
    let end = assoc
        .get_resource_association_set_end(
            &fixture.customers,
            &fixture.preferred_customer,
            Some(&orders_property),
        )
        .expect("end matches a derived instance type");
    assert_eq!(end.resource_type().full_name(), "Northwind.Model.Customer");
}

#[test]
fn type_level_role_navigation() {
    let fixture = base::build();
    let orders_property = property_of(&fixture.customer, "Orders");
    let assoc = fixture
        .model
        .get_association_for_property(&fixture.customer, &orders_property)
        .expect("type-level lookup");
    let atype = assoc.association_type().expect("attached by the fixture");

    assert_eq!(atype.get_end("Customers").multiplicity(), Multiplicity::One);
    assert_eq!(atype.get_related_end("Customers").multiplicity(), Multiplicity::Many);
    assert_eq!(
        atype.get_related_end("Customers").delete_action(),
        OnDeleteAction::Cascade
    );

    let this_end = atype.end_for(&fixture.customer, Some(&orders_property)).unwrap();
    assert_eq!(this_end.role_name().inner(), "Customers");

    let constraint = atype.referential_constraint().expect("fixture constraint");
    assert_eq!(constraint.principal_role().inner(), "Customers");
    assert_eq!(constraint.dependent_properties().len(), 1);
    let principal = atype.principal_end().unwrap();
    assert_eq!(principal.role_name().inner(), "Customers");
}

#[test]
fn referential_constraint_arity_is_validated_at_finalize() {
    let fixture = base::build_unfinalized();
    // One key on Customer but two dependent properties.
    let int_property = |name: &str| {
        ResourceProperty::new(
            name,
            ResourcePropertyKind::PRIMITIVE,
            PropertyTypeRef::Inline(primitive::resource_type(PrimitiveKind::Int32)),
        )
        .unwrap()
    };
    let broken_constraint = ResourceReferentialConstraint::new(
        "Owner",
        vec![int_property("A"), int_property("B")],
    )
    .unwrap();

    let owner_end_property = ResourceProperty::new(
        "Owned",
        ResourcePropertyKind::RESOURCE_SET_REFERENCE,
        PropertyTypeRef::Declared("Northwind.Model.Order".parse().unwrap()),
    )
    .unwrap();
    let broken = ResourceAssociationSet::new(
        "Broken",
        ResourceAssociationSetEnd::new(
            fixture.customers.resource_set().clone(),
            fixture.customer.clone(),
            Some(owner_end_property.clone()),
        )
        .unwrap(),
        ResourceAssociationSetEnd::new(
            fixture.orders.resource_set().clone(),
            fixture.order.clone(),
            None,
        )
        .unwrap(),
    )
    .unwrap();
    broken
        .set_association_type(
            ResourceAssociationType::new(
                "Broken",
                base::NAMESPACE,
                ResourceAssociationTypeEnd::new(
                    "Owner",
                    fixture.customer.clone(),
                    Some(owner_end_property),
                    Multiplicity::One,
                    OnDeleteAction::None,
                )
                .unwrap(),
                ResourceAssociationTypeEnd::new(
                    "Owned",
                    fixture.order.clone(),
                    None,
                    Multiplicity::Many,
                    OnDeleteAction::None,
                )
                .unwrap(),
                Some(broken_constraint),
            )
            .unwrap(),
        )
        .unwrap();
    fixture.model.add_association_set(broken).unwrap();

    let err = fixture
        .model
        .finalize(Vec::new(), UseMetadataKeyOrder::new(false))
        .expect_err("constraint arity mismatch must fail finalization");
    assert!(matches!(err, Error::AssociationSet(_, _)));
}

#[test]
fn ends_require_at_least_one_property() {
    let fixture = base::build_unfinalized();
    let result = ResourceAssociationSet::new(
        "NoProps",
        ResourceAssociationSetEnd::new(
            fixture.customers.resource_set().clone(),
            fixture.customer.clone(),
            None,
        )
        .unwrap(),
        ResourceAssociationSetEnd::new(
            fixture.orders.resource_set().clone(),
            fixture.order.clone(),
            None,
        )
        .unwrap(),
    );
    assert!(matches!(
        result,
        Err(Error::AssociationEndPropertiesBothNull(_))
    ));
}
