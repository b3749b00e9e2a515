use leptos::prelude::*;
use thaw::{Badge, BadgeAppearance, BadgeColor};

/// Цвет бейджа по имени из конфигурации (`statusColors`, `color` группы)
pub fn badge_color(name: &str) -> BadgeColor {
    match name {
        "brand" | "primary" => BadgeColor::Brand,
        "danger" | "error" => BadgeColor::Danger,
        "important" => BadgeColor::Important,
        "severe" => BadgeColor::Severe,
        "subtle" | "neutral" => BadgeColor::Subtle,
        "success" => BadgeColor::Success,
        "warning" => BadgeColor::Warning,
        _ => BadgeColor::Informative,
    }
}

/// Бейдж статуса в ячейке таблицы, карточке или заголовке колонки
#[component]
pub fn StatusBadge(
    #[prop(into)]
    color: String,
    children: Children,
) -> impl IntoView {
    view! {
        <Badge appearance=BadgeAppearance::Tint color=badge_color(&color)>
            {children()}
        </Badge>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_color_names_fall_back_to_informative() {
        assert!(matches!(badge_color("success"), BadgeColor::Success));
        assert!(matches!(badge_color("error"), BadgeColor::Danger));
        assert!(matches!(badge_color("#ff0000"), BadgeColor::Informative));
    }
}
