use ferrite_mlp::{train_network, Dataset, Network};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut network = Network::with_rng(&[2, 3, 1], 0.5, 0.0, &mut StdRng::seed_from_u64(2017))?;
    let xor = Dataset::xor();
    let epochs = 10000;

    for epoch in 0..epochs {
        let loss = train_network(&mut network, &xor.inputs, &xor.targets)?;
        if epoch % 1000 == 0 {
            println!("Epoch {epoch}: loss = {loss:.6}");
        }
    }

    for input in &xor.inputs {
        println!("Input: {:?} -> Output: {:.4}", input, network.predict(input)?[0]);
    }
    Ok(())
}
