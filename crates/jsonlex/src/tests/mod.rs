mod tokens_bad;
