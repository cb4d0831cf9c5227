mod framed;
