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

use odata_svc_metadata::provider::MetadataProviderState;
use odata_svc_metadata::resource::InstanceTypeDescriptor;
use odata_svc_metadata::resource::IsAbstract;
use odata_svc_metadata::resource::IsOpenType;
use odata_svc_metadata::resource::ResourceSet;
use odata_svc_metadata::resource::ResourceType;
use odata_svc_metadata::resource::UseMetadataKeyOrder;
use odata_svc_metadata::Error;
use odata_svc_tests::base;
use std::sync::Arc;

#[test]
fn incremental_reads_work_before_finalize() {
    let fixture = base::build_unfinalized();
    assert_eq!(fixture.model.state(), MetadataProviderState::Incremental);
    assert!(!fixture.customer.is_read_only());

    let found = fixture
        .model
        .try_resolve_resource_type("Northwind.Model.Customer")
        .expect("registered type resolves while incremental");
    assert!(Arc::ptr_eq(&found, &fixture.customer));
    assert!(fixture.model.try_resolve_resource_set("Customers").is_some());
    assert!(fixture.model.try_resolve_resource_type("Nope").is_none());
}

#[test]
fn finalize_seals_the_whole_graph_once() {
    let fixture = base::build();
    assert_eq!(fixture.model.state(), MetadataProviderState::Full);
    for t in [
        &fixture.customer,
        &fixture.preferred_customer,
        &fixture.order,
        &fixture.order_detail,
        &fixture.address,
    ] {
        assert!(t.is_read_only(), "{} must be sealed", t.full_name());
    }
    assert!(fixture.customers.resource_set().is_read_only());
    assert_eq!(
        fixture.customers.resource_set().entity_container_name().inner(),
        "NorthwindEntities"
    );

    // Idempotent.
    fixture
        .model
        .finalize(Vec::new(), UseMetadataKeyOrder::new(false))
        .expect("second finalize is a no-op");
}

#[test]
fn registration_after_finalize_is_rejected() {
    let fixture = base::build();
    let extra = ResourceType::entity(
        "Late",
        base::NAMESPACE,
        InstanceTypeDescriptor::new("Late".to_string()),
        None,
        IsAbstract::new(false),
        IsOpenType::new(false),
    )
    .unwrap();
    assert!(matches!(
        fixture.model.add_resource_type(extra.clone()),
        Err(Error::ModelSealed)
    ));
    let late_set = ResourceSet::new("Lates", extra).unwrap();
    assert!(matches!(
        fixture.model.add_resource_set(late_set),
        Err(Error::ModelSealed)
    ));
}

#[test]
fn name_resolution_supports_bare_and_full_names() {
    let fixture = base::build();
    let by_full = fixture
        .model
        .try_resolve_resource_type("Northwind.Model.Customer")
        .unwrap();
    let by_bare = fixture.model.try_resolve_resource_type("Customer").unwrap();
    assert!(Arc::ptr_eq(&by_full, &by_bare));
    assert!(Arc::ptr_eq(&by_full, &fixture.customer));
}

#[test]
fn derived_type_index_is_built_at_finalize() {
    let fixture = base::build();
    let derived = fixture.model.get_derived_types(&fixture.customer);
    assert_eq!(derived.len(), 1);
    assert!(Arc::ptr_eq(&derived[0], &fixture.preferred_customer));
    assert!(fixture.model.has_derived_types(&fixture.customer));
    assert!(!fixture.model.has_derived_types(&fixture.order));
    assert!(fixture
        .model
        .get_derived_types(&fixture.preferred_customer)
        .is_empty());
}

#[test]
fn duplicate_registrations_fail_fast() {
    let fixture = base::build_unfinalized();
    let clone = ResourceType::entity(
        "Customer",
        base::NAMESPACE,
        InstanceTypeDescriptor::new("Customer".to_string()),
        None,
        IsAbstract::new(false),
        IsOpenType::new(false),
    )
    .unwrap();
    assert!(matches!(
        fixture.model.add_resource_type(clone),
        Err(Error::DuplicateTypeName(_))
    ));
    // Re-registering the identical instance is harmless.
    fixture
        .model
        .add_resource_type(fixture.customer.clone())
        .expect("same instance is a no-op");
}

#[test]
fn keys_follow_the_set_ordering_flag() {
    let fixture = base::build();
    let keys: Vec<_> = fixture
        .customers
        .key_properties()
        .iter()
        .map(|p| p.name().inner().clone())
        .collect();
    assert_eq!(keys, ["Id"]);
    let all: Vec<_> = fixture
        .customer
        .properties()
        .iter()
        .map(|p| p.name().inner().clone())
        .collect();
    assert_eq!(all, ["Id", "Name", "HomeAddress", "Orders"]);
}
