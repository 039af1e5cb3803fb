use super::Translations;
use crate::module_config::{ActionType, ModuleConfig, SolutionConfig};
use crate::naming::to_camel_case;

/// Korean domain and UI terms with their English rendering.
const KO_EN_TERMS: &[(&str, &str)] = &[
    ("거래처", "Vendor"),
    ("품목", "Item"),
    ("사용자", "User"),
    ("터미널", "Terminal"),
    ("코드", "Code"),
    ("주문", "Order"),
    ("견적", "Estimate"),
    ("배송", "Delivery"),
    ("출하", "Shipment"),
    ("출하 요청", "Shipping Request"),
    ("명세서", "Statement"),
    ("세금계산서", "Tax Invoice"),
    ("구매", "Purchase"),
    ("생산계획", "Production Plan"),
    ("작업지시", "Work Order"),
    ("설비", "Machine"),
    ("금형", "Mold"),
    ("입출고", "In/Out"),
    ("수리", "Repair"),
    ("점검", "Check"),
    ("검사", "Inspection"),
    ("상세 목록", "Detail List"),
    ("전체 현황", "Overall Status"),
    ("분석", "Analysis"),
    ("현황", "Status"),
    ("등록", "Register"),
    ("수정", "Edit"),
    ("삭제", "Delete"),
    ("관리", "Management"),
    ("목록", "List"),
];

/// English for a known Korean term, else the text unchanged.
pub fn translate_to_english(korean: &str) -> String {
    KO_EN_TERMS
        .iter()
        .find(|(ko, _)| *ko == korean)
        .map(|(_, en)| en.to_string())
        .unwrap_or_else(|| korean.to_string())
}

const ENGLISH_SUFFIX: &str = " management";

/// Module name without its trailing ` 관리` / ` management`.
fn clean_module_name(name: &str) -> &str {
    if let Some(stripped) = name.strip_suffix(" 관리") {
        return stripped;
    }
    let cut = name.len().saturating_sub(ENGLISH_SUFFIX.len());
    match (name.get(..cut), name.get(cut..)) {
        (Some(head), Some(tail)) if tail.eq_ignore_ascii_case(ENGLISH_SUFFIX) => head,
        _ => name,
    }
}

/// Keys every module of every solution needs.
pub fn config_translations<'a>(
    solutions: impl IntoIterator<Item = (&'a String, &'a SolutionConfig)>,
) -> Translations {
    let mut out = Translations::default();
    for (solution, config) in solutions {
        for (key, module) in &config.modules {
            module_translations(solution, key, module, &mut out);
        }
    }
    out
}

/// Tab titles, tab labels, page titles, dialog titles, select placeholders
/// and per-solution page keys of one module.
pub fn module_translations(
    solution: &str,
    key: &str,
    module: &ModuleConfig,
    out: &mut Translations,
) {
    let camel = to_camel_case(key);
    let ko_name = clean_module_name(&module.name).to_string();
    let en_name = translate_to_english(&ko_name);

    out.add(
        format!("tabs.titles.{camel}"),
        ko_name.clone(),
        en_name.clone(),
    );
    out.add(
        format!("tabs.titles.{camel}Management"),
        format!("{ko_name} 관리"),
        format!("{en_name} Management"),
    );

    for tab in &module.tabs {
        if !tab.id.is_empty() && !tab.name.is_empty() {
            out.add(
                format!("tabs.labels.{}", tab.id),
                tab.name.clone(),
                translate_to_english(&tab.name),
            );
        }
    }

    out.add(
        format!("pages.titles.{camel}List"),
        format!("{ko_name} 목록"),
        format!("{en_name} List"),
    );
    if module.tabs.iter().any(|t| t.id == "related-list") {
        out.add(
            format!("pages.titles.{camel}Detail"),
            format!("{ko_name} 상세 목록"),
            format!("{en_name} Detail List"),
        );
    }

    for action in &module.actions {
        let (suffix, ko, en) = match action.kind {
            ActionType::Create => ("Register", "등록", "Register"),
            ActionType::Edit => ("Edit", "수정", "Edit"),
        };
        out.add(
            format!("tabs.dialogs.{camel}{suffix}"),
            format!("{ko_name} {ko}"),
            format!("{en_name} {en}"),
        );
    }

    if module.custom_select.is_some() {
        out.add(
            format!("select.{camel}Placeholder"),
            format!("{ko_name}을 선택하세요"),
            format!("Select {en_name}"),
        );
    }

    let page_keys = [
        ("list", "목록", "List"),
        ("management", "관리", "Management"),
        ("register", "등록", "Register"),
    ];
    for (leaf, ko, en) in page_keys {
        out.add(
            format!("pages.{solution}.{camel}.{leaf}"),
            format!("{ko_name} {ko}"),
            format!("{en_name} {en}"),
        );
    }
}
