//! Template-data builder.
//!
//! Turns the read-only [`Specification`] into the flat records in
//! [`super::context`]. Missing optional sections never fail a build; the only
//! errors are strict-mode type rejections and unresolved child references.

use std::collections::BTreeMap;

use crate::core::error::{Error, Result};
use crate::core::naming::{to_exported_name, to_file_slug, to_plural, to_wire_tag};
use crate::core::spec::{Aggregate, ChildCollection, Feature, Field, Model, Specification};
use crate::core::types::{GO_UUID_TYPE, TypeMapper};

use super::context::{
    AggregateContext, ChildCollectionContext, ChildContext, FeatureContext, FieldContext,
    HandlerContext, ModelContext, PageContext, ProjectContext, RepositoryContext, RouteContext,
    ValidationContext,
};

/// Validation rules whose generated checks format messages and parse limits.
const NUMERIC_VALIDATIONS: [&str; 4] = ["min_length", "max_length", "min", "max"];

/// Columns appended to audited models.
const AUDIT_COLUMNS: [&str; 2] = ["created_at", "updated_at"];

/// Fields plus the derived per-owner flags.
struct FieldSet {
    fields: Vec<FieldContext>,
    has_validations: bool,
    needs_numeric_support: bool,
    needs_uuid: bool,
}

/// Builds template data for one specification.
#[derive(Debug, Clone, Copy)]
pub struct ContextBuilder<'a> {
    spec: &'a Specification,
    mapper: TypeMapper,
}

impl<'a> ContextBuilder<'a> {
    pub fn new(spec: &'a Specification, mapper: TypeMapper) -> Self {
        Self { spec, mapper }
    }

    pub fn project(&self) -> ProjectContext {
        let http = &self.spec.runtime.http;
        ProjectContext {
            name: self.spec.project.name.clone(),
            module_path: self.spec.project.module.clone(),
            version: self.spec.version.clone(),
            api_host: http.api.host.clone(),
            api_port: self.spec.api_port(),
            web_host: http.web.host.clone(),
            web_port: self.spec.web_port(),
            database_engine: self.spec.database_engine().to_string(),
            database_dsn: self.spec.runtime.database.dsn.clone(),
            features: self.spec.feats.keys().cloned().collect(),
        }
    }

    pub fn feature(&self, feat_name: &str, feat: &Feature) -> FeatureContext {
        FeatureContext {
            package_name: feat_name.to_string(),
            kind: feat.kind.as_str().to_string(),
            module_path: self.spec.project.module.clone(),
            models: feat.models.keys().map(|m| to_exported_name(m)).collect(),
            service_methods: feat
                .service
                .methods
                .iter()
                .map(|m| to_exported_name(m))
                .collect(),
            routes: routes(feat),
            pages: feat
                .web
                .pages
                .iter()
                .map(|page| PageContext {
                    route: page.route.clone(),
                    uses: page.uses.clone(),
                })
                .collect(),
            repo_backends: feat.repo_impl.iter().cloned().collect(),
            auth_enabled: feat.auth_enabled(),
        }
    }

    pub fn model(&self, feat_name: &str, model_name: &str, model: &Model) -> Result<ModelContext> {
        let audit = model.audit();
        let set = self.fields(feat_name, model_name, &model.fields)?;

        Ok(ModelContext {
            package_name: feat_name.to_string(),
            model_name: to_exported_name(model_name),
            file_slug: to_file_slug(model_name),
            audit,
            has_validations: set.has_validations,
            needs_formatting_support: set.needs_numeric_support,
            needs_numeric_parsing_support: set.needs_numeric_support,
            needs_uuid: set.needs_uuid,
            needs_time: audit,
            fields: set.fields,
        })
    }

    pub fn handler(&self, feat_name: &str, feat: &Feature, model_name: &str) -> HandlerContext {
        let audit = feat.models.get(model_name).is_some_and(Model::audit);
        self.handler_for(feat_name, feat, model_name, audit, None)
    }

    pub fn repository(
        &self,
        feat_name: &str,
        model_name: &str,
        model: &Model,
        backend: &str,
    ) -> Result<RepositoryContext> {
        let set = self.fields(feat_name, model_name, &model.fields)?;
        let plural = to_plural(&to_exported_name(model_name));
        let mut columns: Vec<String> = set.fields.iter().map(|f| f.wire_tag.clone()).collect();
        if model.audit() {
            columns.extend(AUDIT_COLUMNS.map(String::from));
        }

        Ok(RepositoryContext {
            package_name: feat_name.to_string(),
            model_name: to_exported_name(model_name),
            table_name: to_wire_tag(&plural),
            model_plural: plural,
            backend: backend.to_string(),
            module_path: self.spec.project.module.clone(),
            audit: model.audit(),
            id_field: set.fields.iter().find(|f| f.is_id).cloned(),
            columns,
            fields: set.fields,
            needs_uuid: set.needs_uuid,
        })
    }

    pub fn aggregate(
        &self,
        feat_name: &str,
        feat: &Feature,
        aggregate_name: &str,
        aggregate: &Aggregate,
    ) -> Result<AggregateContext> {
        let set = self.fields(feat_name, aggregate_name, &aggregate.fields)?;
        let children = aggregate
            .children
            .iter()
            .map(|(child_name, child)| {
                self.child(feat_name, feat, aggregate_name, child_name, child)
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(AggregateContext {
            package_name: feat_name.to_string(),
            root_name: to_exported_name(aggregate_name),
            file_slug: to_file_slug(aggregate_name),
            audit: aggregate.audit,
            fields: set.fields,
            version_field: aggregate.version_field.as_deref().map(to_exported_name),
            version_tag: aggregate.version_field.as_deref().map(to_wire_tag),
            children,
            needs_uuid: set.needs_uuid,
            needs_time: aggregate.audit,
        })
    }

    pub fn child_collection(
        &self,
        feat_name: &str,
        feat: &Feature,
        aggregate: &AggregateContext,
        collection: &ChildContext,
    ) -> ChildCollectionContext {
        let item = feat
            .models
            .keys()
            .find(|name| to_exported_name(name) == collection.item_model)
            .map(String::as_str)
            .unwrap_or(collection.item_model.as_str());

        ChildCollectionContext {
            package_name: feat_name.to_string(),
            root_name: aggregate.root_name.clone(),
            collection: collection.clone(),
            handler: self.handler_for(
                feat_name,
                feat,
                item,
                collection.audit,
                Some(aggregate.root_name.clone()),
            ),
        }
    }

    fn child(
        &self,
        feat_name: &str,
        feat: &Feature,
        aggregate_name: &str,
        child_name: &str,
        child: &ChildCollection,
    ) -> Result<ChildContext> {
        if !feat.models.contains_key(&child.of) {
            return Err(Error::UnknownModelReference {
                feature: feat_name.to_string(),
                aggregate: aggregate_name.to_string(),
                child: child_name.to_string(),
                model: child.of.clone(),
            });
        }
        let item_model = to_exported_name(&child.of);
        Ok(ChildContext {
            name: to_exported_name(child_name),
            wire_tag: to_wire_tag(child_name),
            file_slug: to_file_slug(child_name),
            item_plural: to_plural(&item_model),
            item_model,
            audit: child.audit,
        })
    }

    fn handler_for(
        &self,
        feat_name: &str,
        feat: &Feature,
        model_name: &str,
        audit: bool,
        parent_name: Option<String>,
    ) -> HandlerContext {
        let exported = to_exported_name(model_name);
        let plural = to_plural(&exported);
        HandlerContext {
            package_name: feat_name.to_string(),
            model_lower: to_file_slug(&exported),
            model_plural_lower: to_file_slug(&plural),
            model_name: exported,
            model_plural: plural,
            auth_enabled: feat.auth_enabled(),
            audit,
            module_path: self.spec.project.module.clone(),
            is_child_collection: parent_name.is_some(),
            parent_plural_lower: parent_name.as_deref().map(|p| to_file_slug(&to_plural(p))),
            parent_name,
            routes: routes(feat),
        }
    }

    fn fields(
        &self,
        feat_name: &str,
        owner: &str,
        fields: &BTreeMap<String, Field>,
    ) -> Result<FieldSet> {
        let mut set = FieldSet {
            fields: Vec::with_capacity(fields.len()),
            has_validations: false,
            needs_numeric_support: false,
            needs_uuid: false,
        };

        for (field_name, field) in fields {
            let go_type = self
                .mapper
                .map(&field.field_type)
                .ok_or_else(|| Error::UnmappedType {
                    feature: feat_name.to_string(),
                    owner: owner.to_string(),
                    field: field_name.clone(),
                    tag: field.field_type.clone(),
                })?;

            let validations: Vec<ValidationContext> = field
                .validations
                .iter()
                .map(|v| ValidationContext {
                    name: v.name.clone(),
                    value: v.value.clone(),
                })
                .collect();

            set.has_validations |= !validations.is_empty();
            set.needs_numeric_support |= validations
                .iter()
                .any(|v| NUMERIC_VALIDATIONS.contains(&v.name.as_str()));
            set.needs_uuid |= go_type == GO_UUID_TYPE;

            let wire_tag = to_wire_tag(field_name);
            set.fields.push(FieldContext {
                name: to_exported_name(field_name),
                source_name: field_name.clone(),
                go_type: go_type.to_string(),
                type_tag: field.field_type.clone(),
                is_id: wire_tag == "id",
                wire_tag,
                validations,
            });
        }

        Ok(set)
    }
}

fn routes(feat: &Feature) -> Vec<RouteContext> {
    feat.api
        .routes
        .iter()
        .map(|route| RouteContext {
            method: route.method.to_uppercase(),
            path: route.path.clone(),
            handler: to_exported_name(&route.handler),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::spec::{ModelOptions, Validation};

    fn spec() -> Specification {
        Specification::from_yaml_str(
            r#"
version: "0.2"
project: { name: shop, module: github.com/acme/shop }
runtime:
  http:
    web: { port: 3000 }
feats:
  billing:
    auth: { enabled: true }
    repo_impl: [sqlite]
    models:
      Invoice:
        fields:
          total: float64
          paidAt: text
      Customer:
        options: { audit: true }
        fields:
          id: uuid
          emailAddress:
            type: email
            validations:
              - { name: max_length, value: 120 }
              - { name: required }
    service:
      methods: [create, list]
    api:
      routes:
        - { method: get, path: /invoices, handler: listInvoices }
  orders:
    models:
      Order: { fields: { total: float64 } }
      OrderLine: { fields: { qty: int } }
    aggregates:
      Order:
        versionField: revision
        audit: true
        fields: { total: float64 }
        children:
          lines: { of: OrderLine, audit: true }
"#,
        )
        .unwrap()
    }

    #[test]
    fn test_model_without_validations() {
        let spec = spec();
        let builder = ContextBuilder::new(&spec, TypeMapper::permissive());
        let invoice = &spec.feats["billing"].models["Invoice"];
        let ctx = builder.model("billing", "Invoice", invoice).unwrap();

        assert_eq!(ctx.package_name, "billing");
        assert_eq!(ctx.model_name, "Invoice");
        assert_eq!(ctx.file_slug, "invoice");
        assert!(!ctx.audit);
        assert!(!ctx.has_validations);
        assert!(!ctx.needs_formatting_support);
        assert!(!ctx.needs_numeric_parsing_support);
        assert!(!ctx.needs_uuid);

        let names: Vec<_> = ctx.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["PaidAt", "Total"]);
        assert_eq!(ctx.fields[0].wire_tag, "paid_at");
        assert_eq!(ctx.fields[0].go_type, "string");
        assert_eq!(ctx.fields[1].wire_tag, "total");
        assert_eq!(ctx.fields[1].go_type, "float64");
    }

    #[test]
    fn test_numeric_validation_sets_both_flags() {
        let spec = spec();
        let builder = ContextBuilder::new(&spec, TypeMapper::permissive());
        let customer = &spec.feats["billing"].models["Customer"];
        let ctx = builder.model("billing", "Customer", customer).unwrap();

        assert!(ctx.audit);
        assert!(ctx.needs_time);
        assert!(ctx.has_validations);
        assert!(ctx.needs_formatting_support);
        assert!(ctx.needs_numeric_parsing_support);
        assert!(ctx.needs_uuid);

        let email = ctx
            .fields
            .iter()
            .find(|f| f.source_name == "emailAddress")
            .unwrap();
        assert_eq!(email.wire_tag, "email_address");
        assert_eq!(
            email.validations,
            vec![
                ValidationContext {
                    name: "max_length".to_string(),
                    value: Some("120".to_string()),
                },
                ValidationContext {
                    name: "required".to_string(),
                    value: None,
                },
            ]
        );
        assert!(ctx.fields.iter().any(|f| f.is_id && f.go_type == "uuid.UUID"));
    }

    #[test]
    fn test_non_numeric_validation_sets_neither_flag() {
        let spec = spec();
        let builder = ContextBuilder::new(&spec, TypeMapper::permissive());
        let mut model = Model::default();
        let mut field = Field::new("text");
        field.validations.push(Validation {
            name: "required".to_string(),
            value: None,
        });
        model.fields.insert("title".to_string(), field);

        let ctx = builder.model("notes", "Note", &model).unwrap();
        assert!(ctx.has_validations);
        assert!(!ctx.needs_formatting_support);
        assert!(!ctx.needs_numeric_parsing_support);
    }

    #[test]
    fn test_empty_model_builds() {
        let spec = spec();
        let builder = ContextBuilder::new(&spec, TypeMapper::strict());
        let model = Model {
            options: Some(ModelOptions { audit: true }),
            ..Default::default()
        };
        let ctx = builder.model("notes", "note", &model).unwrap();
        assert!(ctx.fields.is_empty());
        assert_eq!(ctx.model_name, "Note");
        assert!(ctx.audit);
    }

    #[test]
    fn test_strict_mapper_reports_unmapped_field() {
        let spec = spec();
        let builder = ContextBuilder::new(&spec, TypeMapper::strict());
        let mut model = Model::default();
        model
            .fields
            .insert("blob".to_string(), Field::new("frobnicate"));
        let err = builder.model("notes", "Note", &model).unwrap_err();
        assert!(matches!(err, Error::UnmappedType { .. }));

        let builder = ContextBuilder::new(&spec, TypeMapper::permissive());
        let ctx = builder.model("notes", "Note", &model).unwrap();
        assert_eq!(ctx.fields[0].go_type, "any");
    }

    #[test]
    fn test_handler_context() {
        let spec = spec();
        let builder = ContextBuilder::new(&spec, TypeMapper::permissive());
        let billing = &spec.feats["billing"];
        let ctx = builder.handler("billing", billing, "Customer");

        assert_eq!(ctx.model_name, "Customer");
        assert_eq!(ctx.model_plural, "Customers");
        assert_eq!(ctx.model_lower, "customer");
        assert_eq!(ctx.model_plural_lower, "customers");
        assert!(ctx.auth_enabled);
        assert!(ctx.audit);
        assert_eq!(ctx.module_path, "github.com/acme/shop");
        assert!(!ctx.is_child_collection);
        assert_eq!(ctx.parent_name, None);
        assert_eq!(ctx.parent_plural_lower, None);
        assert_eq!(ctx.routes[0].method, "GET");
        assert_eq!(ctx.routes[0].handler, "ListInvoices");
    }

    #[test]
    fn test_feature_and_project_context() {
        let spec = spec();
        let builder = ContextBuilder::new(&spec, TypeMapper::permissive());
        let feature = builder.feature("billing", &spec.feats["billing"]);
        assert_eq!(feature.models, vec!["Customer", "Invoice"]);
        assert_eq!(feature.service_methods, vec!["Create", "List"]);
        assert_eq!(feature.repo_backends, vec!["sqlite"]);
        assert_eq!(feature.kind, "feature");

        let project = builder.project();
        assert_eq!(project.module_path, "github.com/acme/shop");
        assert_eq!(project.web_port, 3000);
        assert_eq!(project.api_port, 8081);
        assert_eq!(project.database_engine, "sqlite");
        assert_eq!(project.features, vec!["billing", "orders"]);
    }

    #[test]
    fn test_repository_context() {
        let spec = spec();
        let builder = ContextBuilder::new(&spec, TypeMapper::permissive());
        let customer = &spec.feats["billing"].models["Customer"];
        let ctx = builder
            .repository("billing", "Customer", customer, "sqlite")
            .unwrap();
        assert_eq!(ctx.table_name, "customers");
        assert_eq!(ctx.model_plural, "Customers");
        assert_eq!(ctx.backend, "sqlite");
        assert!(ctx.needs_uuid);
        assert_eq!(ctx.id_field.as_ref().map(|f| f.go_type.as_str()), Some("uuid.UUID"));
        assert_eq!(
            ctx.columns,
            vec!["email_address", "id", "created_at", "updated_at"]
        );

        let invoice = &spec.feats["billing"].models["Invoice"];
        let ctx = builder
            .repository("billing", "Invoice", invoice, "mongo")
            .unwrap();
        assert_eq!(ctx.id_field, None);
    }

    #[test]
    fn test_aggregate_and_child_collection() {
        let spec = spec();
        let builder = ContextBuilder::new(&spec, TypeMapper::permissive());
        let orders = &spec.feats["orders"];
        let aggregate = builder
            .aggregate("orders", orders, "Order", &orders.aggregates["Order"])
            .unwrap();

        assert_eq!(aggregate.root_name, "Order");
        assert_eq!(aggregate.version_field.as_deref(), Some("Revision"));
        assert_eq!(aggregate.version_tag.as_deref(), Some("revision"));
        assert!(aggregate.needs_time);
        assert_eq!(aggregate.children.len(), 1);
        let lines = &aggregate.children[0];
        assert_eq!(lines.name, "Lines");
        assert_eq!(lines.item_model, "OrderLine");
        assert_eq!(lines.item_plural, "OrderLines");

        let child = builder.child_collection("orders", orders, &aggregate, lines);
        assert!(child.handler.is_child_collection);
        assert_eq!(child.handler.parent_name.as_deref(), Some("Order"));
        assert_eq!(child.handler.parent_plural_lower.as_deref(), Some("orders"));
        assert_eq!(child.handler.model_name, "OrderLine");
        assert_eq!(child.handler.model_plural_lower, "orderlines");
        assert!(child.handler.audit);
    }

    #[test]
    fn test_child_route_uses_parent_plural() {
        let spec = Specification::from_yaml_str(
            r#"
project: { module: example.com/shop }
feats:
  catalog:
    models:
      Product: { fields: { title: string } }
    aggregates:
      Category:
        children:
          items: { of: Product }
"#,
        )
        .unwrap();
        let builder = ContextBuilder::new(&spec, TypeMapper::permissive());
        let catalog = &spec.feats["catalog"];
        let aggregate = builder
            .aggregate("catalog", catalog, "Category", &catalog.aggregates["Category"])
            .unwrap();
        let child =
            builder.child_collection("catalog", catalog, &aggregate, &aggregate.children[0]);

        assert_eq!(child.handler.parent_name.as_deref(), Some("Category"));
        assert_eq!(child.handler.parent_plural_lower.as_deref(), Some("categories"));
    }

    #[test]
    fn test_aggregate_with_unknown_child_fails() {
        let spec = spec();
        let builder = ContextBuilder::new(&spec, TypeMapper::permissive());
        let mut orders = spec.feats["orders"].clone();
        let mut aggregate = orders.aggregates["Order"].clone();
        aggregate.children.insert(
            "refunds".to_string(),
            ChildCollection {
                of: "Refund".to_string(),
                audit: false,
            },
        );
        orders.aggregates.insert("Order".to_string(), aggregate.clone());

        let err = builder
            .aggregate("orders", &orders, "Order", &aggregate)
            .unwrap_err();
        match err {
            Error::UnknownModelReference { child, model, .. } => {
                assert_eq!(child, "refunds");
                assert_eq!(model, "Refund");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
