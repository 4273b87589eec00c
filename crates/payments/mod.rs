pub mod mercadopago_client;
pub mod parsers;
