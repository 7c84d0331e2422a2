// ==========================================
// 工厂设备维护管理系统 - 接口数据规范化
// ==========================================
// 职责: 把后端返回的松散 JSON（字段名不统一、数值可能是字符串）
//       一次性转换为类型化的 Equipment / MaintenanceSchedule
// 红线: 单个字段无法解析时降级为 None，不让整条记录失败
// ==========================================

use crate::domain::equipment::{Equipment, MaintenanceSchedule};
use crate::domain::types::MaintenanceUnit;
use crate::importer::error::{ImportError, ImportResult};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::path::Path;

// ==========================================
// 字段别名（按优先级）
// ==========================================
mod keys {
    pub const ID: &[&str] = &["id"];
    pub const CODE: &[&str] = &["code", "equipmentCode", "equipment_code"];
    pub const NAME: &[&str] = &["name", "equipmentName", "equipment_name"];
    pub const TYPE: &[&str] = &["type", "equipmentType", "equipment_type"];
    pub const LOCATION: &[&str] = &["location"];
    pub const UNIT: &[&str] = &["maintenanceUnit", "maintenance_unit", "unit"];
    pub const CURRENT_USAGE: &[&str] = &[
        "currentUsage",
        "current_usage",
        "currentHours",
        "current_hours",
    ];
    pub const SCHEDULES: &[&str] = &["maintenanceSchedules", "maintenance_schedules", "schedules"];

    pub const INTERVAL: &[&str] = &["intervalValue", "interval_value", "interval"];
    pub const START_FROM: &[&str] = &["startFromUsage", "start_from_usage", "startFrom"];
    pub const LAST_COMPLETED: &[&str] = &[
        "lastCompletedAtUsage",
        "last_completed_at_usage",
        "lastCompletedUsage",
    ];
    pub const DESCRIPTION: &[&str] = &["description"];
    pub const TICKET: &[&str] = &["currentTicketId", "current_ticket_id"];
    pub const STATUS: &[&str] = &["status"];

    /// 列表包装字段
    pub const ENVELOPE: &[&str] = &["data", "items", "equipment"];
}

// ==========================================
// 原始记录
// ==========================================

/// 后端返回的设备原始记录
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct RawEquipmentRecord(pub Map<String, Value>);

/// 后端返回的保养计划原始记录
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct RawScheduleRecord(pub Map<String, Value>);

/// 按别名顺序取第一个非 null 的字段
fn pick<'a>(map: &'a Map<String, Value>, aliases: &[&str]) -> Option<&'a Value> {
    aliases
        .iter()
        .filter_map(|k| map.get(*k))
        .find(|v| !v.is_null())
}

// ==========================================
// 宽松类型转换
// ==========================================

/// 数值或数值字符串 → f64（非有限值视为缺失）
pub fn lenient_f64(value: &Value) -> Option<f64> {
    let v = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let cleaned = s.trim().replace(',', "");
            if cleaned.is_empty() {
                None
            } else {
                cleaned.parse::<f64>().ok()
            }
        }
        _ => None,
    };
    v.filter(|x| x.is_finite())
}

/// 整数或整数字符串 → i64
pub fn lenient_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().and_then(f64_to_i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

/// 整数值浮点 → i64；超出 i64 范围视为缺失
fn f64_to_i64(f: f64) -> Option<i64> {
    // i64::MAX as f64 == 2^63，本身已越界
    if f.fract() != 0.0 || f < i64::MIN as f64 || f >= i64::MAX as f64 {
        return None;
    }
    Some(f as i64)
}

/// 字符串（去空白，空串视为缺失）；数值转为字符串
pub fn lenient_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

// ==========================================
// 规范化
// ==========================================

impl RawScheduleRecord {
    fn f64_field(&self, aliases: &[&str]) -> Option<f64> {
        pick(&self.0, aliases).and_then(lenient_f64)
    }
}

/// 规范化保养计划
pub fn normalize_schedule(raw: &RawScheduleRecord) -> MaintenanceSchedule {
    let map = &raw.0;
    MaintenanceSchedule {
        id: pick(map, keys::ID).and_then(lenient_i64),
        interval_value: raw.f64_field(keys::INTERVAL),
        start_from_usage: raw.f64_field(keys::START_FROM),
        last_completed_at_usage: raw.f64_field(keys::LAST_COMPLETED),
        description: pick(map, keys::DESCRIPTION).and_then(lenient_string),
        current_ticket_id: pick(map, keys::TICKET).and_then(lenient_i64),
        status: pick(map, keys::STATUS).and_then(lenient_string),
    }
}

/// 规范化设备
pub fn normalize_equipment(raw: &RawEquipmentRecord) -> Equipment {
    let map = &raw.0;
    let id = pick(map, keys::ID).and_then(lenient_i64);

    let schedules = match pick(map, keys::SCHEDULES) {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| match item {
                Value::Object(obj) => Some(normalize_schedule(&RawScheduleRecord(obj.clone()))),
                other => {
                    tracing::warn!(value = %other, "保养计划记录不是对象，已忽略");
                    None
                }
            })
            .collect(),
        _ => Vec::new(),
    };

    Equipment {
        id,
        code: pick(map, keys::CODE)
            .and_then(lenient_string)
            .or_else(|| id.map(|v| v.to_string()))
            .unwrap_or_default(),
        name: pick(map, keys::NAME).and_then(lenient_string).unwrap_or_default(),
        equipment_type: pick(map, keys::TYPE).and_then(lenient_string),
        location: pick(map, keys::LOCATION).and_then(lenient_string),
        maintenance_unit: pick(map, keys::UNIT)
            .and_then(lenient_string)
            .and_then(|s| MaintenanceUnit::parse(&s)),
        current_usage: pick(map, keys::CURRENT_USAGE).and_then(lenient_f64),
        maintenance_schedules: schedules,
    }
}

/// 解析设备列表 JSON
///
/// 支持:
/// - 裸数组 `[...]`
/// - 包装对象 `{"data": [...]}` / `{"items": [...]}` / `{"data": {"items": [...]}}`
///
/// 只有 JSON 本身非法或找不到列表时报错；非对象元素被忽略
pub fn parse_equipment_list(json: &str) -> ImportResult<Vec<Equipment>> {
    let root: Value = serde_json::from_str(json)?;
    let items = extract_list(&root).ok_or_else(|| {
        ImportError::UnexpectedShape("未找到设备列表（期望数组或 data/items 包装）".to_string())
    })?;

    let equipment: Vec<Equipment> = items
        .iter()
        .filter_map(|item| match item {
            Value::Object(obj) => Some(normalize_equipment(&RawEquipmentRecord(obj.clone()))),
            other => {
                tracing::warn!(value = %other, "设备记录不是对象，已忽略");
                None
            }
        })
        .collect();

    tracing::debug!(count = equipment.len(), "设备列表规范化完成");
    Ok(equipment)
}

fn extract_list(value: &Value) -> Option<&Vec<Value>> {
    match value {
        Value::Array(items) => Some(items),
        Value::Object(map) => keys::ENVELOPE
            .iter()
            .filter_map(|k| map.get(*k))
            .find_map(extract_list),
        _ => None,
    }
}

/// 读取设备列表文件（.json）
pub fn load_equipment_file(path: &Path) -> ImportResult<Vec<Equipment>> {
    if !path.exists() {
        return Err(ImportError::FileNotFound(path.display().to_string()));
    }

    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    if !ext.eq_ignore_ascii_case("json") {
        return Err(ImportError::UnsupportedFormat(ext.to_string()));
    }

    let content = std::fs::read_to_string(path)?;
    parse_equipment_list(&content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(v: Value) -> RawEquipmentRecord {
        serde_json::from_value(v).unwrap()
    }

    #[test]
    fn test_lenient_f64() {
        assert_eq!(lenient_f64(&json!(12.5)), Some(12.5));
        assert_eq!(lenient_f64(&json!(" 4500.00 ")), Some(4500.0));
        assert_eq!(lenient_f64(&json!("1,200")), Some(1200.0));
        assert_eq!(lenient_f64(&json!("abc")), None);
        assert_eq!(lenient_f64(&json!("")), None);
        assert_eq!(lenient_f64(&json!(true)), None);
        assert_eq!(lenient_f64(&json!("NaN")), None);
    }

    #[test]
    fn test_lenient_i64() {
        assert_eq!(lenient_i64(&json!(42)), Some(42));
        assert_eq!(lenient_i64(&json!(42.0)), Some(42));
        assert_eq!(lenient_i64(&json!(42.5)), None);
        assert_eq!(lenient_i64(&json!("17")), Some(17));
        assert_eq!(lenient_i64(&json!(-3.0)), Some(-3));
        assert_eq!(lenient_i64(&json!(1e19)), None);
        assert_eq!(lenient_i64(&json!(-1e30)), None);
        assert_eq!(lenient_i64(&json!(9.223372036854775807e18)), None);
    }

    #[test]
    fn test_normalize_camel_case() {
        let eq = normalize_equipment(&raw(json!({
            "id": 3,
            "code": "CNC-03",
            "name": "数控车床",
            "maintenanceUnit": "hours",
            "currentUsage": "4500",
            "maintenanceSchedules": [
                { "id": 11, "intervalValue": 5000, "startFromUsage": 0, "currentTicketId": null }
            ]
        })));

        assert_eq!(eq.id, Some(3));
        assert_eq!(eq.code, "CNC-03");
        assert_eq!(eq.maintenance_unit, Some(MaintenanceUnit::Hours));
        assert_eq!(eq.current_usage, Some(4500.0));
        assert_eq!(eq.maintenance_schedules.len(), 1);
        let s = &eq.maintenance_schedules[0];
        assert_eq!(s.id, Some(11));
        assert_eq!(s.interval_value, Some(5000.0));
        assert_eq!(s.start_from_usage, Some(0.0));
        assert_eq!(s.current_ticket_id, None);
    }

    #[test]
    fn test_normalize_snake_case_and_current_hours() {
        let eq = normalize_equipment(&raw(json!({
            "equipment_code": "GEN-1",
            "maintenance_unit": "h",
            "current_hours": 120.5,
            "schedules": [
                { "interval_value": "250", "last_completed_at_usage": "100", "current_ticket_id": "8", "status": "warning" }
            ]
        })));

        assert_eq!(eq.code, "GEN-1");
        assert_eq!(eq.current_usage, Some(120.5));
        let s = &eq.maintenance_schedules[0];
        assert_eq!(s.interval_value, Some(250.0));
        assert_eq!(s.last_completed_at_usage, Some(100.0));
        assert_eq!(s.current_ticket_id, Some(8));
        assert_eq!(s.status.as_deref(), Some("warning"));
    }

    #[test]
    fn test_current_usage_takes_first_present_alias() {
        let eq = normalize_equipment(&raw(json!({
            "code": "X",
            "current_usage": null,
            "current_hours": 77
        })));
        assert_eq!(eq.current_usage, Some(77.0));
    }

    #[test]
    fn test_bad_fields_degrade_to_none() {
        let eq = normalize_equipment(&raw(json!({
            "id": 9,
            "maintenanceUnit": "liters",
            "currentUsage": "n/a",
            "maintenanceSchedules": [ { "intervalValue": "soon" }, "garbage" ]
        })));

        assert_eq!(eq.code, "9");
        assert_eq!(eq.maintenance_unit, None);
        assert_eq!(eq.current_usage, None);
        assert_eq!(eq.maintenance_schedules.len(), 1);
        assert_eq!(eq.maintenance_schedules[0].interval_value, None);
    }

    #[test]
    fn test_parse_equipment_list_shapes() {
        let bare = parse_equipment_list(r#"[{"code":"A"},{"code":"B"}, 5]"#).unwrap();
        assert_eq!(bare.len(), 2);

        let wrapped = parse_equipment_list(r#"{"data":[{"code":"A"}]}"#).unwrap();
        assert_eq!(wrapped[0].code, "A");

        let nested = parse_equipment_list(r#"{"data":{"items":[{"code":"C"}]}}"#).unwrap();
        assert_eq!(nested[0].code, "C");
    }

    #[test]
    fn test_parse_equipment_list_errors() {
        assert!(matches!(
            parse_equipment_list("{not json"),
            Err(ImportError::JsonParseError(_))
        ));
        assert!(matches!(
            parse_equipment_list(r#"{"total": 0}"#),
            Err(ImportError::UnexpectedShape(_))
        ));
    }

    #[test]
    fn test_load_equipment_file_missing() {
        let result = load_equipment_file(Path::new("/definitely/not/here.json"));
        assert!(matches!(result, Err(ImportError::FileNotFound(_))));
    }
}
