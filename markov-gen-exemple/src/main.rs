use markov_gen_core::model::generation_input::GenerationInput;
use markov_gen_core::model::markov_chain::MarkovChain;

/// Built-in corpus used when no file is given on the command line.
const DEMO_CORPUS: &str = "\
    The rain fell on the quiet town. The town slept under a grey sky. \
    A cat walked along the wet street. The street was empty and cold. \
    The cat found a warm door and sat down. Nobody opened the door. \
    The rain stopped before morning. The morning light touched the roofs. \
    People walked along the street again. The town woke up slowly.";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Build a chain of order 2 (contexts of two consecutive words)
    let mut chain = MarkovChain::new(2)?;

    // Train from the corpus file passed as first argument,
    // or from the built-in demo corpus
    match std::env::args().nth(1) {
        Some(path) => chain.train_file(&path)?,
        None => chain.train_text(DEMO_CORPUS),
    }
    println!("Trained: {} contexts of {} words", chain.context_count(), chain.n());

    // Generation parameters; defaults are max_length 15, min_length 5,
    // stop probability 0.7 and 5 sentences per text
    let mut input = GenerationInput::default();
    input.max_length = 20;

    // Attempting to set an out-of-range stop probability
    match input.set_stop_probability(1.5) {
        Ok(_) => println!("Should not happen"),
        Err(_) => println!("Stop probability 1.5 is invalid, must be between 0.0 and 1.0"),
    }
    match input.set_stop_probability(-0.5) {
        Ok(_) => println!("Should not happen"),
        Err(_) => println!("Stop probability -0.5 is invalid, must be between 0.0 and 1.0"),
    }

    // Keep the historical value
    input.set_stop_probability(0.7)?;

    // Generate 5 individual sentences
    for i in 0..5 {
        println!("Sentence {}: {}", i + 1, chain.generate_sentence(&input));
    }

    // Generate a joined text of input.sentence_count sentences
    println!("Text: {}", chain.generate_text(&input));

    Ok(())
}
