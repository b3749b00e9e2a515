use crate::layout::global_context::AppGlobalContext;
use crate::layout::ToastService;
use crate::routes::routes::AppRoutes;
use crate::shared::dynamic_page::{ConfigRegistry, RegistrySource};
use crate::system::auth::context::AuthProvider;
use leptos::prelude::*;

/// Источник конфигураций задаётся при сборке: `ERP_PAGE_SOURCE=embedded`
/// берёт встроенные документы, иначе они запрашиваются у backend.
fn registry_source() -> RegistrySource {
    match option_env!("ERP_PAGE_SOURCE") {
        Some("embedded") => RegistrySource::Embedded,
        _ => RegistrySource::Remote,
    }
}

#[component]
pub fn App() -> impl IntoView {
    let ctx = AppGlobalContext::new();
    ctx.init_router_integration();
    provide_context(ctx);

    provide_context(ToastService::new());
    provide_context(ConfigRegistry::new(registry_source()));

    view! {
        <AuthProvider>
            <AppRoutes />
        </AuthProvider>
    }
}
