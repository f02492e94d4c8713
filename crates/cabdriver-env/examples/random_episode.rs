use std::path::PathBuf;

use cabdriver_env::{Action, CabSession, EnvConfig, TimeMatrix, load_time_matrix_json};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

fn main() {
    env_logger::init();

    let config = EnvConfig::from_default_yaml().expect("bundled config should parse");
    let matrix = match std::env::args().nth(1).map(PathBuf::from) {
        Some(path) => load_time_matrix_json(&path).expect("failed to load time matrix JSON"),
        None => {
            let mut rng = ChaCha8Rng::seed_from_u64(2024);
            TimeMatrix::random(&config, &mut rng, 1..=11)
        }
    };

    let mut session = CabSession::from_config(config, 12345).expect("invalid config");
    let mut policy_rng = ChaCha8Rng::seed_from_u64(7);

    // Accept a uniformly random offered request, idling about one time in five.
    let summary = session
        .run_episode(&matrix, 10_000, |_state, requests| {
            if policy_rng.gen_bool(0.2) {
                return Action::NoRide;
            }
            let pick = policy_rng.gen_range(0..requests.len());
            requests.actions[pick]
        })
        .expect("episode failed");

    println!(
        "initial_state={} final_state={} steps={} elapsed_hours={}",
        session.env().state_init(),
        summary.final_state,
        summary.steps,
        summary.elapsed_hours
    );
    println!("total_reward={:.1}", summary.total_reward);
}
