mod envelope;
mod mutate;
mod read;
