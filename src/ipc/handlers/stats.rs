use crate::calc;
use crate::ipc::error::{calc_err, ok, ok_serialized};
use crate::ipc::params;
use crate::ipc::types::{AppState, Request};
use crate::select;
use serde_json::json;

fn handle_select(req: &Request) -> serde_json::Value {
    let values: Vec<f64> = match params::required(req, &["values"]) {
        Ok(v) => v,
        Err(e) => return e,
    };
    let k: usize = match params::required(req, &["k"]) {
        Ok(v) => v,
        Err(e) => return e,
    };
    match select::select(&values, k) {
        Ok(value) => ok(&req.id, json!({ "value": value })),
        Err(e) => calc_err(&req.id, &e),
    }
}

fn handle_median(req: &Request) -> serde_json::Value {
    let values: Vec<f64> = match params::required(req, &["values"]) {
        Ok(v) => v,
        Err(e) => return e,
    };
    match select::median(&values) {
        Ok(median) => ok(
            &req.id,
            json!({
                "median": median,
                "safeMedian": calc::safe_median(&values),
            }),
        ),
        Err(e) => calc_err(&req.id, &e),
    }
}

fn handle_aggregates(req: &Request) -> serde_json::Value {
    let values: Vec<f64> = match params::required(req, &["values"]) {
        Ok(v) => v,
        Err(e) => return e,
    };
    ok(
        &req.id,
        json!({
            "count": values.len(),
            "mean": calc::safe_mean(&values),
            "minimum": calc::safe_min(&values),
            "maximum": calc::safe_max(&values),
            "median": calc::safe_median(&values),
            "stdDev": calc::safe_population_std_dev(&values),
        }),
    )
}

fn handle_class_statistics(req: &Request) -> serde_json::Value {
    let grades: Vec<f64> = match params::required(req, &["finalGrades", "final_grades"]) {
        Ok(v) => v,
        Err(e) => return e,
    };
    ok_serialized(&req.id, &calc::class_statistics(&grades))
}

pub fn try_handle(_state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "calc.select" => Some(handle_select(req)),
        "calc.median" => Some(handle_median(req)),
        "calc.aggregates" => Some(handle_aggregates(req)),
        "calc.classStatistics" => Some(handle_class_statistics(req)),
        _ => None,
    }
}
