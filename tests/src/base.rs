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

//! A small Northwind-shaped model used by every scenario:
//!
//! - `Customer` (key `Id`, complex `HomeAddress`, navigation
//!   `Orders`), with derived `PreferredCustomer`
//! - `Order` (key `Id`, foreign key `CustomerId`, navigation
//!   `Customer` and one-directional `OrderDetails`)
//! - `OrderDetail` (key `Id`, no reverse navigation)
//! - `Address` complex type
//! - sets `Customers`, `Orders`, `OrderDetails`
//! - a service operation `GetCustomerByName` and bound actions
//!   `Touch` and `GetDetails` (path `customer/Orders/OrderDetails`)

use odata_svc_metadata::association::Multiplicity;
use odata_svc_metadata::association::OnDeleteAction;
use odata_svc_metadata::association::ResourceAssociationSet;
use odata_svc_metadata::association::ResourceAssociationSetEnd;
use odata_svc_metadata::association::ResourceAssociationType;
use odata_svc_metadata::association::ResourceAssociationTypeEnd;
use odata_svc_metadata::association::ResourceReferentialConstraint;
use odata_svc_metadata::operation::Operation;
use odata_svc_metadata::operation::OperationParameter;
use odata_svc_metadata::operation::ResourceSetPathExpression;
use odata_svc_metadata::operation::ServiceOperationResultKind;
use odata_svc_metadata::resource::primitive;
use odata_svc_metadata::resource::InstanceTypeDescriptor;
use odata_svc_metadata::resource::IsAbstract;
use odata_svc_metadata::resource::IsOpenType;
use odata_svc_metadata::resource::PrimitiveKind;
use odata_svc_metadata::resource::PropertyTypeRef;
use odata_svc_metadata::resource::ResourceProperty;
use odata_svc_metadata::resource::ResourcePropertyKind;
use odata_svc_metadata::resource::ResourceSet;
use odata_svc_metadata::resource::ResourceSetWrapper;
use odata_svc_metadata::resource::ResourceType;
use odata_svc_metadata::resource::UseMetadataKeyOrder;
use odata_svc_metadata::MetadataModel;
use std::sync::Arc;

pub const NAMESPACE: &str = "Northwind.Model";

/// The fixture model plus direct handles to its pieces.
pub struct Northwind {
    pub model: Arc<MetadataModel>,
    pub customer: Arc<ResourceType>,
    pub preferred_customer: Arc<ResourceType>,
    pub order: Arc<ResourceType>,
    pub order_detail: Arc<ResourceType>,
    pub address: Arc<ResourceType>,
    pub customers: Arc<ResourceSetWrapper>,
    pub orders: Arc<ResourceSetWrapper>,
    pub order_details: Arc<ResourceSetWrapper>,
}

fn descriptor(name: &str) -> InstanceTypeDescriptor {
    InstanceTypeDescriptor::new(name.to_string())
}

fn key_property(name: &str) -> Arc<ResourceProperty> {
    ResourceProperty::new(
        name,
        ResourcePropertyKind::PRIMITIVE | ResourcePropertyKind::KEY,
        PropertyTypeRef::Inline(primitive::resource_type(PrimitiveKind::Int32)),
    )
    .expect("valid key property")
}

fn string_property(name: &str) -> Arc<ResourceProperty> {
    ResourceProperty::new(
        name,
        ResourcePropertyKind::PRIMITIVE,
        PropertyTypeRef::Inline(primitive::resource_type(PrimitiveKind::String)),
    )
    .expect("valid string property")
}

/// Build and register the model, but leave it incremental.
pub fn build_unfinalized() -> Northwind {
    let model = Arc::new(
        MetadataModel::new("NorthwindEntities", NAMESPACE).expect("valid container"),
    );

    let address = ResourceType::complex("Address", NAMESPACE, descriptor("Address"), None)
        .expect("valid complex type");
    address.add_property(string_property("Street")).unwrap();
    address.add_property(string_property("City")).unwrap();

    let customer = ResourceType::entity(
        "Customer",
        NAMESPACE,
        descriptor("Customer"),
        None,
        IsAbstract::new(false),
        IsOpenType::new(false),
    )
    .expect("valid entity type");
    customer.add_property(key_property("Id")).unwrap();
    customer.add_property(string_property("Name")).unwrap();
    customer
        .add_property(
            ResourceProperty::new(
                "HomeAddress",
                ResourcePropertyKind::COMPLEX_TYPE,
                PropertyTypeRef::Declared(format!("{NAMESPACE}.Address").parse().unwrap()),
            )
            .unwrap(),
        )
        .unwrap();
    let customer_orders = ResourceProperty::new(
        "Orders",
        ResourcePropertyKind::RESOURCE_SET_REFERENCE,
        PropertyTypeRef::Declared(format!("{NAMESPACE}.Order").parse().unwrap()),
    )
    .unwrap();
    customer.add_property(customer_orders.clone()).unwrap();

    let preferred_customer = ResourceType::entity(
        "PreferredCustomer",
        NAMESPACE,
        descriptor("PreferredCustomer"),
        Some(customer.clone()),
        IsAbstract::new(false),
        IsOpenType::new(false),
    )
    .expect("valid derived type");
    preferred_customer
        .add_property(string_property("Tier"))
        .unwrap();

    let order = ResourceType::entity(
        "Order",
        NAMESPACE,
        descriptor("Order"),
        None,
        IsAbstract::new(false),
        IsOpenType::new(false),
    )
    .expect("valid entity type");
    order.add_property(key_property("Id")).unwrap();
    let order_customer_id = ResourceProperty::new(
        "CustomerId",
        ResourcePropertyKind::PRIMITIVE,
        PropertyTypeRef::Inline(primitive::resource_type(PrimitiveKind::Int32)),
    )
    .unwrap();
    order.add_property(order_customer_id.clone()).unwrap();
    let order_customer = ResourceProperty::new(
        "Customer",
        ResourcePropertyKind::RESOURCE_REFERENCE,
        PropertyTypeRef::Declared(format!("{NAMESPACE}.Customer").parse().unwrap()),
    )
    .unwrap();
    order.add_property(order_customer.clone()).unwrap();
    let order_details_property = ResourceProperty::new(
        "OrderDetails",
        ResourcePropertyKind::RESOURCE_SET_REFERENCE,
        PropertyTypeRef::Declared(format!("{NAMESPACE}.OrderDetail").parse().unwrap()),
    )
    .unwrap();
    order.add_property(order_details_property.clone()).unwrap();

    let order_detail = ResourceType::entity(
        "OrderDetail",
        NAMESPACE,
        descriptor("OrderDetail"),
        None,
        IsAbstract::new(false),
        IsOpenType::new(false),
    )
    .expect("valid entity type");
    order_detail.add_property(key_property("Id")).unwrap();

    for t in [
        &address,
        &customer,
        &preferred_customer,
        &order,
        &order_detail,
    ] {
        model.add_resource_type(t.clone()).expect("registered");
    }

    let customers_set = ResourceSet::new("Customers", customer.clone()).unwrap();
    let orders_set = ResourceSet::new("Orders", order.clone()).unwrap();
    let details_set = ResourceSet::new("OrderDetails", order_detail.clone()).unwrap();
    let customers = model.add_resource_set(customers_set.clone()).unwrap();
    let orders = model.add_resource_set(orders_set.clone()).unwrap();
    let order_details = model.add_resource_set(details_set.clone()).unwrap();

    // Customers <-> Orders, with a referential constraint pinning the
    // customer end to Order.CustomerId.
    let customer_fk =
        ResourceReferentialConstraint::new("Customers", vec![order_customer_id]).unwrap();
    let customers_orders = ResourceAssociationSet::new(
        "Customers_Orders",
        ResourceAssociationSetEnd::new(
            customers_set.clone(),
            customer.clone(),
            Some(customer_orders.clone()),
        )
        .unwrap(),
        ResourceAssociationSetEnd::new(
            orders_set.clone(),
            order.clone(),
            Some(order_customer.clone()),
        )
        .unwrap(),
    )
    .unwrap();
    customers_orders
        .set_association_type(
            ResourceAssociationType::new(
                "Customers_Orders",
                NAMESPACE,
                ResourceAssociationTypeEnd::new(
                    "Customers",
                    customer.clone(),
                    Some(customer_orders),
                    Multiplicity::One,
                    OnDeleteAction::None,
                )
                .unwrap(),
                ResourceAssociationTypeEnd::new(
                    "Orders",
                    order.clone(),
                    Some(order_customer),
                    Multiplicity::Many,
                    OnDeleteAction::Cascade,
                )
                .unwrap(),
                Some(customer_fk),
            )
            .unwrap(),
        )
        .unwrap();
    model.add_association_set(customers_orders).unwrap();

    // Orders -> OrderDetails, one-directional: the detail side has no
    // reverse navigation property.
    let orders_details = ResourceAssociationSet::new(
        "Orders_OrderDetails",
        ResourceAssociationSetEnd::new(
            orders_set,
            order.clone(),
            Some(order_details_property.clone()),
        )
        .unwrap(),
        ResourceAssociationSetEnd::new(details_set, order_detail.clone(), None).unwrap(),
    )
    .unwrap();
    orders_details
        .set_association_type(
            ResourceAssociationType::new(
                "Orders_OrderDetails",
                NAMESPACE,
                ResourceAssociationTypeEnd::new(
                    "Orders",
                    order.clone(),
                    Some(order_details_property),
                    Multiplicity::One,
                    OnDeleteAction::None,
                )
                .unwrap(),
                ResourceAssociationTypeEnd::new(
                    "Details",
                    order_detail.clone(),
                    None,
                    Multiplicity::Many,
                    OnDeleteAction::None,
                )
                .unwrap(),
                None,
            )
            .unwrap(),
        )
        .unwrap();
    model.add_association_set(orders_details).unwrap();

    // Operations.
    let by_name = Operation::service_operation(
        "GetCustomerByName",
        ServiceOperationResultKind::QueryWithSingleResult,
        Some(customer.clone()),
        vec![
            OperationParameter::new("name", primitive::resource_type(PrimitiveKind::String))
                .unwrap(),
        ],
        Some(customers_set),
    )
    .unwrap();
    model.add_service_operation(by_name).unwrap();

    let touch = Operation::service_action(
        "Touch",
        ServiceOperationResultKind::Void,
        None,
        vec![OperationParameter::new("customer", customer.clone()).unwrap()],
        None,
        None,
    )
    .unwrap();
    model.add_service_operation(touch).unwrap();

    let get_details = Operation::service_action(
        "GetDetails",
        ServiceOperationResultKind::QueryWithMultipleResults,
        Some(order_detail.clone()),
        vec![OperationParameter::new("customer", customer.clone()).unwrap()],
        None,
        Some(ResourceSetPathExpression::new("customer/Orders/OrderDetails").unwrap()),
    )
    .unwrap();
    model.add_service_operation(get_details).unwrap();

    Northwind {
        model,
        customer,
        preferred_customer,
        order,
        order_detail,
        address,
        customers,
        orders,
        order_details,
    }
}

/// Build and finalize the model.
pub fn build() -> Northwind {
    let fixture = build_unfinalized();
    fixture
        .model
        .finalize(Vec::new(), UseMetadataKeyOrder::new(false))
        .expect("fixture model is consistent");
    fixture
}
