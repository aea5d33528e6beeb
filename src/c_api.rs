#![allow(non_snake_case)]

use crate::{
    config::SimulationConfig, distribution::Distribution, integrator::IntegratorKind,
    system::System,
};

fn into_handle(result: Result<System, crate::ConfigError>) -> *mut System {
    match result {
        Ok(system) => Box::into_raw(Box::new(system)),
        Err(err) => {
            log::error!("failed to create system: {err}");
            std::ptr::null_mut()
        }
    }
}

/// Builds the two-cluster scenario. `integrator` is 0 for Euler, 1 for RK4.
/// Returns null for an unknown integrator code or rejected parameters.
#[unsafe(no_mangle)]
pub extern "C" fn NBody_Create(body_count: usize, integrator: u32, dt: f64, seed: u64) -> *mut System {
    let kind = match integrator {
        0 => IntegratorKind::Euler,
        1 => IntegratorKind::Rk4,
        other => {
            log::error!("unknown integrator code {other}");
            return std::ptr::null_mut();
        }
    };
    let config = SimulationConfig {
        seed,
        ..SimulationConfig::new(body_count, Distribution::two_clusters(), kind, dt)
    };
    into_handle(System::from_config(&config))
}

/// Builds a system from a UTF-8 YAML scenario. Returns null on any error.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn NBody_CreateFromYaml(yaml: *const u8, len: usize) -> *mut System {
    if yaml.is_null() {
        return std::ptr::null_mut();
    }
    let bytes = unsafe { std::slice::from_raw_parts(yaml, len) };
    let Ok(text) = std::str::from_utf8(bytes) else {
        log::error!("scenario is not valid UTF-8");
        return std::ptr::null_mut();
    };
    into_handle(SimulationConfig::from_yaml_str(text).and_then(|c| System::from_config(&c)))
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn NBody_Destroy(handle: *mut System) {
    if !handle.is_null() {
        unsafe { drop(Box::from_raw(handle)) };
    }
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn NBody_Step(handle: *mut System) {
    if let Some(system) = unsafe { handle.as_mut() } {
        system.step();
    }
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn NBody_GetBodyCount(handle: *const System) -> usize {
    unsafe { handle.as_ref() }.map_or(0, |system| system.len())
}

/// Writes up to `capacity` positions into `out` as interleaved x, y pairs
/// (`out` must hold `2 * capacity` doubles). Returns the number of points written.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn NBody_CopyPositions(
    handle: *const System,
    out: *mut f64,
    capacity: usize,
) -> usize {
    let Some(system) = (unsafe { handle.as_ref() }) else {
        return 0;
    };
    if out.is_null() {
        return 0;
    }

    let count = capacity.min(system.len());
    let out = unsafe { std::slice::from_raw_parts_mut(out, count * 2) };
    for (pair, body) in out.chunks_exact_mut(2).zip(system.bodies()) {
        pair[0] = body.position.x;
        pair[1] = body.position.y;
    }
    count
}
