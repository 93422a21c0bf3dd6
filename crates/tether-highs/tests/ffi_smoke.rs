use tether_highs::{HighsHandle, HighsOption, ObjectiveSense, translate};
use tether_solver::State;

fn quiet(handle: &mut HighsHandle) {
    handle
        .set_option("output_flag", &HighsOption::Bool(false))
        .expect("failed to silence HiGHS");
}

#[test]
fn test_minimize_simple() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();

    // minimize x subject to x >= 1
    let mut handle = HighsHandle::new().expect("failed to create HiGHS");
    quiet(&mut handle);
    let x = handle.add_col(1.0, 1.0, f64::INFINITY, "x").unwrap();
    handle.set_objective_sense(ObjectiveSense::Minimize).unwrap();

    handle.run().expect("run failed");
    let code = handle.model_status().unwrap();
    assert_eq!(translate(code), State::Optimal);

    let obj_value = handle.objective_value().unwrap();
    let x_value = handle.col_values().expect("missing solution")[x];
    assert!(
        (obj_value - 1.0).abs() < 1e-6,
        "Expected objective value ~1.0, got {}",
        obj_value
    );
    assert!(
        (x_value - 1.0).abs() < 1e-6,
        "Expected x ~1.0, got {}",
        x_value
    );
}

#[test]
fn test_integer_variable_is_enforced() {
    let mut handle = HighsHandle::new().unwrap();
    quiet(&mut handle);
    let x = handle.add_col(1.0, 0.0, 10.0, "x").unwrap();
    handle.set_integrality(x, true).unwrap();
    handle
        .add_row(f64::NEG_INFINITY, 1.5, &[x], &[1.0], "cap")
        .expect("failed to add row");
    handle.set_objective_sense(ObjectiveSense::Maximize).unwrap();

    handle.run().unwrap();
    assert_eq!(translate(handle.model_status().unwrap()), State::Optimal);

    let x_value = handle.col_values().expect("missing solution")[x];
    assert!(
        (x_value - 1.0).abs() < 1e-6,
        "Expected integer x = 1.0, got {}",
        x_value
    );
}

#[test]
fn test_objective_offset_is_reported() {
    let mut handle = HighsHandle::new().unwrap();
    quiet(&mut handle);
    handle.add_col(2.0, 1.0, 4.0, "x").unwrap();
    handle.set_objective_offset(5.0).unwrap();

    handle.run().unwrap();
    let value = handle.objective_value().unwrap();
    assert!((value - 7.0).abs() < 1e-6, "got {value}");
}

#[test]
fn test_hessian_minimizes_parabola() {
    // minimize x^2 - 2x: Q = [2], c = [-2], optimum x = 1, value -1
    let mut handle = HighsHandle::new().unwrap();
    quiet(&mut handle);
    handle
        .add_col(-2.0, f64::NEG_INFINITY, f64::INFINITY, "x")
        .unwrap();
    handle.pass_hessian(1, &[0], &[0], &[2.0]).unwrap();

    handle.run().unwrap();
    assert_eq!(translate(handle.model_status().unwrap()), State::Optimal);
    let x_value = handle.col_values().unwrap()[0];
    assert!((x_value - 1.0).abs() < 1e-5, "got {x_value}");
    assert!((handle.objective_value().unwrap() + 1.0).abs() < 1e-5);
}

#[test]
fn test_infeasible_has_no_primal_solution() {
    let mut handle = HighsHandle::new().unwrap();
    quiet(&mut handle);
    // Presolve may only report unbounded-or-infeasible.
    handle
        .set_option("presolve", &HighsOption::Str("off".to_string()))
        .unwrap();
    let x = handle.add_col(1.0, 0.0, f64::INFINITY, "x").unwrap();
    handle
        .add_row(5.0, f64::INFINITY, &[x], &[1.0], "low")
        .unwrap();
    handle
        .add_row(f64::NEG_INFINITY, 2.0, &[x], &[1.0], "high")
        .unwrap();

    handle.run().unwrap();
    assert_eq!(translate(handle.model_status().unwrap()), State::Infeasible);
    assert!(handle.col_values().is_err());
}

#[test]
fn test_disposed_handle_rejects_calls() {
    let mut handle = HighsHandle::new().unwrap();
    handle.dispose();
    assert!(handle.run().is_err());
    assert!(handle.model_status().is_err());
    handle.dispose();
}

#[test]
fn test_version_is_available() {
    let version = tether_highs::highs_version().expect("HiGHS version");
    assert!(!version.is_empty());
}
