mod ser;
mod value;
