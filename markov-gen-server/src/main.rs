use actix_cors::Cors;
use actix_web::{get, middleware, web, App, HttpResponse, HttpServer, Responder};

use serde::Deserialize;
use markov_gen_core::model::generation_input::GenerationInput;
use markov_gen_core::model::markov_chain::MarkovChain;

/// Struct representing query parameters for the `/v1/generate` endpoint
#[derive(Deserialize)]
struct GenerateParams {
	max_length: Option<usize>,
	count: Option<usize>,
	stop_probability: Option<f32>,
}

struct SharedData {
	chain: MarkovChain
}

impl GenerateParams {
	/// Builds the generation input, falling back to defaults for
	/// missing parameters.
	fn generation_input(&self) -> Result<GenerationInput, String> {
		let mut input = GenerationInput::default();
		if let Some(max_length) = self.max_length {
			input.max_length = max_length;
		}
		if let Some(count) = self.count {
			input.sentence_count = count;
		}
		if let Some(stop_probability) = self.stop_probability {
			input.set_stop_probability(stop_probability)?;
		}
		Ok(input)
	}
}

/// HTTP GET endpoint `/`
///
/// Renders the single page of the service: a fresh batch of generated
/// text wrapped in minimal HTML. Generated tokens contain no markup
/// characters, so the text is embedded as-is.
#[get("/")]
async fn index(data: web::Data<SharedData>) -> impl Responder {
	let text = data.chain.generate_text(&GenerationInput::default());
	let html = format!(
		"<html>\n\
		\t<head><title>Markov Sentence Generator</title></head>\n\
		\t<body>\n\
		\t\t<h1>Generated Text:</h1>\n\
		\t\t<p>{text}</p>\n\
		\t</body>\n\
		</html>"
	);
	HttpResponse::Ok()
		.content_type("text/html; charset=utf-8")
		.body(html)
}

/// HTTP GET endpoint `/v1/generate`
///
/// Generates text from the shared chain based on query parameters.
/// Returns the generated text as the response body.
#[get("/v1/generate")]
async fn get_generated(data: web::Data<SharedData>, query: web::Query<GenerateParams>) -> impl Responder {
	let input = match query.generation_input() {
		Ok(input) => input,
		Err(e) => return HttpResponse::BadRequest().body(e)
	};

	HttpResponse::Ok().body(data.chain.generate_text(&input))
}

/// Main entry point for the server.
///
/// Trains the Markov chain once from the corpus file, shares it
/// read-only across workers, and starts an Actix-web HTTP server.
///
/// # Notes
/// - The server binds to 127.0.0.1:5000.
/// - The corpus path is taken from the first CLI argument and defaults
///   to ./data/corpus.txt.
/// - The chain is never mutated after startup, so no lock is needed.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
	env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

	let corpus_path = std::env::args().nth(1).unwrap_or_else(|| "./data/corpus.txt".to_owned());

	// Cannot fail, n = 2 is a valid order
	let mut chain = MarkovChain::new(2).unwrap();
	chain.train_file(&corpus_path)
		.map_err(|e| std::io::Error::new(std::io::ErrorKind::NotFound, e.to_string()))?;
	log::info!("Trained on '{}' ({} contexts)", corpus_path, chain.context_count());

	let shared_data = web::Data::new(SharedData { chain });

	HttpServer::new(move || {
		App::new()
			.app_data(shared_data.clone())
			.wrap(middleware::Logger::default())
			.wrap(Cors::permissive())
			.service(index)
			.service(get_generated)
	})
		.bind(("127.0.0.1", 5000))?
		.run()
		.await
}

#[cfg(test)]
mod tests {
	use super::*;
	use actix_web::test;

	fn trained_data() -> web::Data<SharedData> {
		let mut chain = MarkovChain::new(2).unwrap();
		chain.train_text("The cat sat on the mat. The cat ran away. The dog barked at the cat.");
		web::Data::new(SharedData { chain })
	}

	#[actix_web::test]
	async fn index_serves_html_page() {
		let app = test::init_service(
			App::new().app_data(trained_data()).service(index)
		).await;

		let req = test::TestRequest::get().uri("/").to_request();
		let resp = test::call_service(&app, req).await;
		assert!(resp.status().is_success());

		let body = test::read_body(resp).await;
		let page = std::str::from_utf8(&body).unwrap();
		assert!(page.contains("<h1>Generated Text:</h1>"));
	}

	#[actix_web::test]
	async fn generate_returns_text() {
		let app = test::init_service(
			App::new().app_data(trained_data()).service(get_generated)
		).await;

		let req = test::TestRequest::get().uri("/v1/generate?count=2&max_length=10").to_request();
		let resp = test::call_service(&app, req).await;
		assert!(resp.status().is_success());

		let body = test::read_body(resp).await;
		assert!(!body.is_empty());
	}

	#[actix_web::test]
	async fn generate_rejects_invalid_stop_probability() {
		let app = test::init_service(
			App::new().app_data(trained_data()).service(get_generated)
		).await;

		let req = test::TestRequest::get().uri("/v1/generate?stop_probability=1.5").to_request();
		let resp = test::call_service(&app, req).await;
		assert_eq!(resp.status(), actix_web::http::StatusCode::BAD_REQUEST);
	}
}
