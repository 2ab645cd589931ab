mod failure;
mod support;
