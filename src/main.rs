use rand::Rng;
use rl_2048::engine::Direction;
use rl_2048::episode::Episode;

fn main() {
    let mut ep = Episode::new();
    ep.reset(0);
    let mut rng = rand::thread_rng();
    println!("{}", ep.board());
    loop {
        let obs = ep.agent_turn_observe();
        let legal: Vec<Direction> = Direction::ALL
            .into_iter()
            .filter(|d| obs.legal_mask[d.index()])
            .collect();
        if legal.is_empty() {
            break;
        }
        let dir = legal[rng.gen_range(0..legal.len())];
        let t = ep.apply_agent_action(dir);
        println!("{}", ep.board());
        if t.terminal || ep.apply_random_spawn() {
            break;
        }
    }
    println!(
        "Game over after {} timesteps, highest tile: {}",
        ep.timestep(),
        ep.board().highest_tile()
    );
}
