use std::collections::BTreeMap;
use std::sync::Arc;

use tinta_core::ServiceError;
use tinta_store::EntityStore;
use tinta_view::{
    Detail, FormInput, FormResult, Fragment, Page, render_fragment, render_list,
    validate_and_save,
};

use crate::model::CatalogItem;
use crate::views::{ResourceViews, resource_views};

/// Catalog service: generic CRUD over the simple reference resources,
/// dispatched by resource key.
pub struct CatalogService {
    store: Arc<EntityStore>,
    views: BTreeMap<&'static str, ResourceViews>,
}

impl CatalogService {
    pub fn new(store: Arc<EntityStore>) -> Self {
        Self { store, views: resource_views() }
    }

    fn views_for(&self, resource: &str) -> Result<&ResourceViews, ServiceError> {
        self.views
            .get(resource)
            .ok_or_else(|| ServiceError::NotFound(format!("unknown catalog resource: {resource}")))
    }

    pub fn list(&self, resource: &str, raw: &BTreeMap<String, String>) -> Result<Page, ServiceError> {
        let views = self.views_for(resource)?;
        render_list(&views.list, &self.store, raw)
    }

    pub fn list_fragment(
        &self,
        resource: &str,
        raw: &BTreeMap<String, String>,
    ) -> Result<Fragment, ServiceError> {
        let views = self.views_for(resource)?;
        render_fragment(&views.list, &self.store, raw)
    }

    pub fn create(&self, resource: &str, input: FormInput) -> Result<FormResult, ServiceError> {
        let views = self.views_for(resource)?;
        validate_and_save(&self.store, &views.form, None, input)
    }

    pub fn update(
        &self,
        resource: &str,
        id: &str,
        input: FormInput,
    ) -> Result<FormResult, ServiceError> {
        let views = self.views_for(resource)?;
        validate_and_save(&self.store, &views.form, Some(id), input)
    }

    pub fn detail(&self, resource: &str, id: &str) -> Result<Detail, ServiceError> {
        let views = self.views_for(resource)?;
        let record = self.store.get(resource, id)?;
        Ok(views.detail.render(&record, None))
    }

    pub fn get_item(&self, resource: &str, id: &str) -> Result<CatalogItem, ServiceError> {
        self.views_for(resource)?;
        let doc = self.store.get(resource, id)?;
        serde_json::from_value(doc).map_err(|e| ServiceError::Internal(e.to_string()))
    }

    pub fn delete(&self, resource: &str, id: &str) -> Result<(), ServiceError> {
        self.views_for(resource)?;
        self.store.delete(resource, id)?;
        tracing::info!(resource, id, "catalog record removed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tinta_sql::{SQLStore, SqliteStore};
    use tinta_store::{Registry, schema::init_schema};
    use tinta_view::Detail;

    fn service() -> CatalogService {
        let mut registry = Registry::new();
        for spec in crate::views::resource_specs() {
            registry.register(spec);
        }
        let sql: Arc<dyn SQLStore> = Arc::new(SqliteStore::open_in_memory().unwrap());
        let registry = Arc::new(registry);
        init_schema(sql.as_ref(), &registry).unwrap();
        CatalogService::new(Arc::new(EntityStore::new(sql, registry)))
    }

    fn input(pairs: &[(&str, &str)]) -> FormInput {
        FormInput {
            fields: pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect(),
            collections: BTreeMap::new(),
        }
    }

    fn saved_id(result: FormResult) -> String {
        match result {
            FormResult::Saved(doc) => doc["id"].as_str().unwrap().to_string(),
            FormResult::Rejected(r) => panic!("unexpected rejection: {:?}", r.errors),
        }
    }

    #[test]
    fn crud_roundtrip_on_materials() {
        let svc = service();
        let id = saved_id(svc.create("materials", input(&[("name", "Tinta Acrílica")])).unwrap());

        let page = svc.list("materials", &BTreeMap::new()).unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.rows[0][1], "Tinta Acrílica");

        let result = svc
            .update("materials", &id, input(&[("name", "Tinta Látex"), ("idle", "True")]))
            .unwrap();
        saved_id(result);

        let item = svc.get_item("materials", &id).unwrap();
        assert_eq!(item.name, "Tinta Látex");
        assert!(item.idle);

        svc.delete("materials", &id).unwrap();
        assert!(svc.get_item("materials", &id).is_err());
    }

    #[test]
    fn unit_measures_require_a_code() {
        let svc = service();
        let rejected = svc.create("unit_measures", input(&[("name", "Metro Quadrado")])).unwrap();
        match rejected {
            FormResult::Rejected(r) => assert_eq!(r.errors.parent[0].field, "code"),
            FormResult::Saved(_) => panic!("should have required code"),
        }

        let id = saved_id(
            svc.create("unit_measures", input(&[("code", "m²"), ("name", "Metro Quadrado")]))
                .unwrap(),
        );
        let item = svc.get_item("unit_measures", &id).unwrap();
        assert_eq!(item.display(), "Metro Quadrado (m²)");
    }

    #[test]
    fn detail_derives_default_layout() {
        let svc = service();
        let id = saved_id(svc.create("rooms", input(&[("name", "Sala")])).unwrap());

        let detail: Detail = svc.detail("rooms", &id).unwrap();
        assert_eq!(detail.title, "Sala");
        assert_eq!(detail.tabs.len(), 1);
        assert_eq!(detail.buttons.len(), 3);
        assert_eq!(detail.buttons[0].url, format!("/rooms/{id}/edit"));
    }

    #[test]
    fn unknown_resource_is_not_found() {
        let svc = service();
        let err = svc.list("bogus", &BTreeMap::new()).unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[test]
    fn idle_filter_narrows_listing() {
        let svc = service();
        saved_id(svc.create("services", input(&[("name", "Pintura")])).unwrap());
        saved_id(svc.create("services", input(&[("name", "Lixamento"), ("idle", "True")])).unwrap());

        let raw: BTreeMap<String, String> =
            [("idle".to_string(), "True".to_string())].into_iter().collect();
        let page = svc.list("services", &raw).unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.rows[0][1], "Lixamento");
    }
}
